//! Headless preview host
//!
//! Runs the face once through its whole lifecycle on the development machine
//! and prints each rendered frame as ASCII art.

use std::{process, time::Instant};

use chrono::NaiveDateTime;
use embedded_graphics::{geometry::Point, mono_font::MonoFont, primitives::Rectangle};

use analog_watchface::{
    assets,
    battery::BatteryState,
    config::{BUILD_TIMESTAMP, CANVAS_H, CANVAS_W, TIMEZONE},
    time::TimeReference,
    ui::{bitmap::Bitmap, WatchFace},
    AssetId, Error, FaceRenderer, FrameBuffer, Host, LayerId, Pulse, Resource, TimeUnits,
};

struct PreviewHost {
    started: Instant,
    clock: TimeReference,
    live: Vec<Resource>,
    ticks: TimeUnits,
    connectivity: bool,
    connected: bool,
    icon_hidden: bool,
    dirty: bool,
}

impl PreviewHost {
    fn new() -> Result<Self, Error> {
        Ok(Self {
            started: Instant::now(),
            clock: TimeReference::from_timestamp(BUILD_TIMESTAMP, TIMEZONE, 0)?,
            live: Vec::new(),
            ticks: TimeUnits::NONE,
            connectivity: false,
            connected: false,
            icon_hidden: false,
            dirty: true,
        })
    }

    fn ticks_us(&self) -> u64 {
        self.started.elapsed().as_micros() as u64
    }

    fn acquire(&mut self, resource: Resource) {
        println!("acquire {:?}", resource);
        self.live.push(resource);
    }

    /// Deliver a connectivity report, if the face asked for them
    fn report_connection<F: WatchFace>(&mut self, face: &mut F, connected: bool) {
        self.connected = connected;
        if self.connectivity {
            face.on_connection(self, connected);
        }
    }

    /// Deliver a tick as if `prev` had been the time of the previous one
    fn tick<F: WatchFace>(&mut self, face: &mut F, prev: &NaiveDateTime) {
        let now = self.now();
        if let Some(changed) = self.ticks.due(prev, &now) {
            face.on_tick(self, &now, changed);
        }
    }

    /// Composite and print the frame if anything changed
    fn present<F: WatchFace>(&mut self, face: &F) {
        if !self.dirty {
            return;
        }
        self.dirty = false;

        let mut frame = FrameBuffer::new();
        let _ = face.draw(LayerId::Face, &*self, &mut frame);
        if !self.icon_hidden {
            let _ = face.draw(LayerId::Icon, &*self, &mut frame);
        }
        print_frame(&frame);
    }
}

impl Host for PreviewHost {
    fn create_window(&mut self) -> Result<(), Error> {
        self.acquire(Resource::Window);
        Ok(())
    }

    fn create_layer(&mut self, layer: LayerId, bounds: Rectangle) -> Result<(), Error> {
        if !self.live.contains(&Resource::Window) {
            return Err(Error::SurfaceUnavailable);
        }
        println!("layer {:?} at {:?}", layer, bounds);
        self.acquire(Resource::Layer(layer));
        Ok(())
    }

    fn load_bitmap(&mut self, id: AssetId) -> Result<Bitmap<'static>, Error> {
        let bitmap = assets::bitmap(id)?;
        self.acquire(Resource::Bitmap(id));
        Ok(bitmap)
    }

    fn load_font(&mut self, id: AssetId) -> Result<&'static MonoFont<'static>, Error> {
        let font = assets::font(id)?;
        self.acquire(Resource::Font(id));
        Ok(font)
    }

    fn release(&mut self, resource: Resource) {
        println!("release {:?}", resource);
        self.live.retain(|r| *r != resource);
    }

    fn subscribe_ticks(&mut self, units: TimeUnits) {
        self.ticks = self.ticks | units;
    }

    fn subscribe_connectivity(&mut self) {
        self.connectivity = true;
    }

    fn connected(&self) -> bool {
        self.connected
    }

    fn battery(&self) -> BatteryState {
        BatteryState::new(80, false)
    }

    fn now(&self) -> NaiveDateTime {
        self.clock.now(self.ticks_us())
    }

    fn vibrate(&mut self, pulse: Pulse) {
        println!("vibrate {:?}", pulse);
    }

    fn set_layer_hidden(&mut self, layer: LayerId, hidden: bool) {
        if layer == LayerId::Icon && self.icon_hidden != hidden {
            self.icon_hidden = hidden;
            self.dirty = true;
        }
    }

    fn mark_dirty(&mut self, _layer: LayerId) {
        self.dirty = true;
    }
}

fn print_frame(frame: &FrameBuffer) {
    for y in 0..CANVAS_H as i32 {
        let row: String = (0..CANVAS_W as i32)
            .map(|x| match frame.pixel(Point::new(x, y)) {
                Some(color) if color.is_on() => '#',
                _ => ' ',
            })
            .collect();
        println!("{}", row.trim_end());
    }
}

pub fn run() {
    let mut host = match PreviewHost::new() {
        Ok(host) => host,
        Err(e) => {
            eprintln!("cannot start preview: {}", e);
            process::exit(1);
        }
    };

    let mut face = match FaceRenderer::init(&mut host) {
        Ok(face) => face,
        Err(e) => {
            eprintln!("face failed to start: {}", e);
            process::exit(1);
        }
    };
    println!("{}", host.now());
    host.present(&face);

    host.report_connection(&mut face, true);
    // a repeated report changes nothing
    host.report_connection(&mut face, true);

    let prev = host.now() - chrono::TimeDelta::minutes(1);
    host.tick(&mut face, &prev);
    host.present(&face);

    face.deinit(&mut host);
    if !host.live.is_empty() {
        eprintln!("leaked {:?}", host.live);
        process::exit(1);
    }
}
