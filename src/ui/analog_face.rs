//! Analog watchface
//!
//! Hour and minute hands over a background raster, a date line on top, a
//! battery bar under it, and a bluetooth icon that shows while the watch is
//! disconnected from the phone.

use chrono::NaiveDateTime;
use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::Point,
    pixelcolor::BinaryColor,
    primitives::Rectangle,
};
use heapless::Vec;

use super::{
    hand::{Hand, HOUR_POINTS, MINUTE_POINTS},
    render::{self, FaceAssets},
    DrawCommand, Frame, WatchFace, WatchFaceState, BLACK, WHITE,
};
use crate::{
    clock::ClockState,
    config::{
        BATTERY_DOT_RADIUS, BATTERY_TRACK_HALF, BATTERY_TRACK_START, BATTERY_TRACK_Y,
        CANVAS_SIZE, CENTER, DATE_TEXT_BOUNDS, DOT_RADIUS, ICON_BOUNDS,
    },
    date::date_text,
    AssetId, Error, Host, LayerId, Pulse, Resource, TimeUnits,
};

/// Host resources acquired during startup
const RESOURCES: usize = 6;

/// Bluetooth link state, as last reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum Link {
    Connected,
    Disconnected,
}

impl Link {
    pub const fn from_connected(connected: bool) -> Self {
        if connected {
            Link::Connected
        } else {
            Link::Disconnected
        }
    }

    /// Apply a report, returning the new state if it is a transition
    pub fn update(&mut self, connected: bool) -> Option<Link> {
        let next = Link::from_connected(connected);
        if next == *self {
            return None;
        }
        *self = next;
        Some(next)
    }
}

/// The analog face
#[derive(Debug)]
pub struct FaceRenderer {
    assets: FaceAssets,
    hour_hand: Hand,
    minute_hand: Hand,
    link: Link,
}

impl FaceRenderer {
    /// Acquire window, rasters, layers and font, recording each in `acquired`
    fn acquire<H: Host>(host: &mut H, acquired: &mut Vec<Resource, RESOURCES>) -> Result<FaceAssets, Error> {
        host.create_window()?;
        let _ = acquired.push(Resource::Window);

        let background = host.load_bitmap(AssetId::Background)?;
        let _ = acquired.push(Resource::Bitmap(AssetId::Background));
        if background.size() != CANVAS_SIZE {
            return Err(Error::CorruptAsset(AssetId::Background));
        }

        let icon = host.load_bitmap(AssetId::BluetoothIcon)?;
        let _ = acquired.push(Resource::Bitmap(AssetId::BluetoothIcon));
        if icon.size() != ICON_BOUNDS.size {
            return Err(Error::CorruptAsset(AssetId::BluetoothIcon));
        }

        host.create_layer(LayerId::Icon, ICON_BOUNDS)?;
        let _ = acquired.push(Resource::Layer(LayerId::Icon));

        let font = host.load_font(AssetId::DateFont)?;
        let _ = acquired.push(Resource::Font(AssetId::DateFont));

        host.create_layer(LayerId::Face, Rectangle::new(Point::zero(), CANVAS_SIZE))?;
        let _ = acquired.push(Resource::Layer(LayerId::Face));

        Ok(FaceAssets {
            background,
            icon,
            font,
        })
    }

    /// Current link state
    pub fn link(&self) -> Link {
        self.link
    }

    /// Build the draw commands for one redraw of the face layer
    pub fn compose(&self, state: &WatchFaceState) -> Frame {
        let clock = ClockState::from_time(&state.time);
        let hour_hand = self.hour_hand.rotated(clock.hour_angle());
        let minute_hand = self.minute_hand.rotated(clock.min_angle());

        [
            DrawCommand::Bitmap {
                asset: AssetId::Background,
                origin: Point::zero(),
            },
            DrawCommand::Text {
                text: date_text(&state.time),
                bounds: DATE_TEXT_BOUNDS,
                color: WHITE,
            },
            DrawCommand::Line {
                start: Point::new(BATTERY_TRACK_START, BATTERY_TRACK_Y),
                end: Point::new(BATTERY_TRACK_START + 2 * BATTERY_TRACK_HALF, BATTERY_TRACK_Y),
                color: WHITE,
            },
            DrawCommand::FillCircle {
                center: Point::new(state.battery.indicator_x(), BATTERY_TRACK_Y),
                radius: BATTERY_DOT_RADIUS,
                color: WHITE,
            },
            DrawCommand::FillPath {
                hand: hour_hand,
                color: WHITE,
            },
            DrawCommand::OutlinePath {
                hand: hour_hand,
                color: BLACK,
            },
            DrawCommand::StrokeCircle {
                center: CENTER,
                radius: DOT_RADIUS + 4,
                color: WHITE,
            },
            DrawCommand::FillPath {
                hand: minute_hand,
                color: WHITE,
            },
            DrawCommand::OutlinePath {
                hand: minute_hand,
                color: BLACK,
            },
            // hub
            DrawCommand::FillCircle {
                center: CENTER,
                radius: DOT_RADIUS + 3,
                color: WHITE,
            },
            // pin
            DrawCommand::FillCircle {
                center: CENTER,
                radius: DOT_RADIUS,
                color: BLACK,
            },
        ]
    }
}

impl WatchFace for FaceRenderer {
    fn init<H: Host>(host: &mut H) -> Result<Self, Error> {
        let mut acquired = Vec::new();
        let assets = match Self::acquire(host, &mut acquired) {
            Ok(assets) => assets,
            Err(e) => {
                log_warn!("Face startup failed: {}", e);
                for resource in acquired.iter().rev() {
                    host.release(*resource);
                }
                return Err(e);
            }
        };

        let mut hour_hand = Hand::new(&HOUR_POINTS);
        hour_hand.move_to(CENTER);
        let mut minute_hand = Hand::new(&MINUTE_POINTS);
        minute_hand.move_to(CENTER);

        host.subscribe_ticks(TimeUnits::MINUTE);
        host.subscribe_connectivity();

        // Startup is not a transition: no pulse, the icon just matches the link
        let connected = host.connected();
        host.set_layer_hidden(LayerId::Icon, connected);
        log_info!("Face initialized, connected: {}", connected);

        Ok(Self {
            assets,
            hour_hand,
            minute_hand,
            link: Link::from_connected(connected),
        })
    }

    fn deinit<H: Host>(self, host: &mut H) {
        host.release(Resource::Layer(LayerId::Face));
        host.release(Resource::Layer(LayerId::Icon));
        host.release(Resource::Font(AssetId::DateFont));
        host.release(Resource::Bitmap(AssetId::Background));
        host.release(Resource::Bitmap(AssetId::BluetoothIcon));
        host.release(Resource::Window);
        log_info!("Face released");
    }

    fn on_tick<H: Host>(&mut self, host: &mut H, _time: &NaiveDateTime, _changed: TimeUnits) {
        host.mark_dirty(LayerId::Face);
    }

    fn on_connection<H: Host>(&mut self, host: &mut H, connected: bool) {
        match self.link.update(connected) {
            Some(Link::Connected) => {
                log_info!("Bluetooth connected");
                host.vibrate(Pulse::Short);
                host.set_layer_hidden(LayerId::Icon, true);
            }
            Some(Link::Disconnected) => {
                log_info!("Bluetooth disconnected");
                host.vibrate(Pulse::Long);
                host.set_layer_hidden(LayerId::Icon, false);
            }
            None => {}
        }
    }

    fn draw<H, D>(&self, layer: LayerId, host: &H, target: &mut D) -> Result<(), D::Error>
    where
        H: Host,
        D: DrawTarget<Color = BinaryColor>,
    {
        match layer {
            LayerId::Face => {
                let frame = self.compose(&WatchFaceState::read(host));
                render::paint(&frame, &self.assets, target)
            }
            LayerId::Icon => render::draw_bitmap(&self.assets.icon, ICON_BOUNDS.top_left, target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        battery::BatteryState,
        config::FULL_TURN,
        testing::{at, HostCall, RecordingHost},
        ui::framebuffer::FrameBuffer,
    };
    use embedded_graphics::geometry::Size;

    fn face(host: &mut RecordingHost) -> FaceRenderer {
        FaceRenderer::init(host).unwrap()
    }

    #[test]
    fn test_init_acquires_and_subscribes() {
        let mut host = RecordingHost::new();
        let _face = face(&mut host);
        assert_eq!(
            host.live,
            [
                Resource::Window,
                Resource::Bitmap(AssetId::Background),
                Resource::Bitmap(AssetId::BluetoothIcon),
                Resource::Layer(LayerId::Icon),
                Resource::Font(AssetId::DateFont),
                Resource::Layer(LayerId::Face),
            ]
        );
        assert_eq!(host.tick_units, Some(TimeUnits::MINUTE));
        assert!(host.connectivity_subscribed);
        assert!(host.pulses.is_empty());
    }

    #[test]
    fn test_init_snapshot_connected_hides_icon() {
        let mut host = RecordingHost::new();
        host.connected = true;
        let face = face(&mut host);
        assert_eq!(face.link(), Link::Connected);
        assert_eq!(host.icon_hidden, Some(true));
        assert!(host.pulses.is_empty());
    }

    #[test]
    fn test_init_snapshot_disconnected_shows_icon() {
        let mut host = RecordingHost::new();
        host.connected = false;
        let face = face(&mut host);
        assert_eq!(face.link(), Link::Disconnected);
        assert_eq!(host.icon_hidden, Some(false));
        assert!(host.pulses.is_empty());
    }

    #[test]
    fn test_failed_startup_releases_acquired() {
        let mut host = RecordingHost::new();
        host.fail_on = Some(AssetId::DateFont);
        let result = FaceRenderer::init(&mut host);
        assert_eq!(result.err(), Some(Error::MissingAsset(AssetId::DateFont)));
        assert!(host.live.is_empty());
        assert_eq!(
            host.released,
            [
                Resource::Layer(LayerId::Icon),
                Resource::Bitmap(AssetId::BluetoothIcon),
                Resource::Bitmap(AssetId::Background),
                Resource::Window,
            ]
        );
        // nothing subscribed on failure
        assert_eq!(host.tick_units, None);
    }

    #[test]
    fn test_wrong_sized_background_is_corrupt() {
        let mut host = RecordingHost::new();
        host.small_background = true;
        let result = FaceRenderer::init(&mut host);
        assert_eq!(result.err(), Some(Error::CorruptAsset(AssetId::Background)));
        assert!(host.live.is_empty());
    }

    #[test]
    fn test_tick_only_marks_dirty() {
        let mut host = RecordingHost::new();
        let mut face = face(&mut host);
        host.calls.clear();
        let now = at(10, 30);
        face.on_tick(&mut host, &now, TimeUnits::MINUTE);
        assert_eq!(host.calls, [HostCall::MarkDirty(LayerId::Face)]);
    }

    #[test]
    fn test_connect_transition() {
        let mut host = RecordingHost::new();
        host.connected = false;
        let mut face = face(&mut host);
        face.on_connection(&mut host, true);
        assert_eq!(host.pulses, [Pulse::Short]);
        assert_eq!(host.icon_hidden, Some(true));
    }

    #[test]
    fn test_disconnect_transition() {
        let mut host = RecordingHost::new();
        host.connected = true;
        let mut face = face(&mut host);
        face.on_connection(&mut host, false);
        assert_eq!(host.pulses, [Pulse::Long]);
        assert_eq!(host.icon_hidden, Some(false));
    }

    #[test]
    fn test_repeated_report_is_idempotent() {
        let mut host = RecordingHost::new();
        host.connected = false;
        let mut face = face(&mut host);
        host.calls.clear();

        face.on_connection(&mut host, true);
        let after_first = host.calls.len();
        face.on_connection(&mut host, true);
        assert_eq!(host.calls.len(), after_first);
        assert_eq!(host.pulses, [Pulse::Short]);

        face.on_connection(&mut host, true);
        face.on_connection(&mut host, false);
        face.on_connection(&mut host, false);
        assert_eq!(host.pulses, [Pulse::Short, Pulse::Long]);
    }

    #[test]
    fn test_report_matching_snapshot_is_noop() {
        let mut host = RecordingHost::new();
        host.connected = true;
        let mut face = face(&mut host);
        host.calls.clear();
        face.on_connection(&mut host, true);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn test_compose_layering() {
        let mut host = RecordingHost::new();
        let face = face(&mut host);
        let state = WatchFaceState {
            time: at(3, 29),
            battery: BatteryState::new(50, false),
        };
        let frame = face.compose(&state);

        assert_eq!(
            frame[0],
            DrawCommand::Bitmap {
                asset: AssetId::Background,
                origin: Point::zero()
            }
        );
        match &frame[1] {
            DrawCommand::Text { text, bounds, color } => {
                assert_eq!(text.as_str(), "TUE 5 MAR");
                assert_eq!(*bounds, DATE_TEXT_BOUNDS);
                assert_eq!(*color, WHITE);
            }
            other => panic!("expected text, got {:?}", other),
        }
        assert_eq!(
            frame[2],
            DrawCommand::Line {
                start: Point::new(35, 15),
                end: Point::new(107, 15),
                color: WHITE
            }
        );
        assert_eq!(
            frame[3],
            DrawCommand::FillCircle {
                center: Point::new(71, 15),
                radius: 2,
                color: WHITE
            }
        );

        let hour = match frame[4] {
            DrawCommand::FillPath { hand, color: WHITE } => hand,
            ref other => panic!("expected hour fill, got {:?}", other),
        };
        assert_eq!(hour.angle(), FULL_TURN * 17 / 60);
        assert_eq!(hour.offset(), CENTER);
        assert_eq!(frame[5], DrawCommand::OutlinePath { hand: hour, color: BLACK });

        assert_eq!(
            frame[6],
            DrawCommand::StrokeCircle {
                center: CENTER,
                radius: 8,
                color: WHITE
            }
        );

        let minute = match frame[7] {
            DrawCommand::FillPath { hand, color: WHITE } => hand,
            ref other => panic!("expected minute fill, got {:?}", other),
        };
        assert_eq!(minute.angle(), FULL_TURN * 29 / 60);
        assert_eq!(frame[8], DrawCommand::OutlinePath { hand: minute, color: BLACK });

        assert_eq!(
            frame[9],
            DrawCommand::FillCircle {
                center: CENTER,
                radius: 7,
                color: WHITE
            }
        );
        assert_eq!(
            frame[10],
            DrawCommand::FillCircle {
                center: CENTER,
                radius: 4,
                color: BLACK
            }
        );
    }

    #[test]
    fn test_full_lifecycle() {
        let mut host = RecordingHost::new();
        host.time = at(9, 0);
        host.battery = BatteryState::new(100, true);
        let mut face = face(&mut host);

        face.on_tick(&mut host, &at(9, 0), TimeUnits::MINUTE);
        assert!(host.calls.contains(&HostCall::MarkDirty(LayerId::Face)));

        let mut fb = FrameBuffer::new();
        face.draw(LayerId::Face, &host, &mut fb).unwrap();

        // hub pin is black, hub ring around it white
        assert_eq!(fb.pixel(CENTER), Some(BinaryColor::Off));
        assert_eq!(fb.pixel(CENTER + Point::new(6, 0)), Some(BinaryColor::On));
        // 9:00: the hour hand body runs left of the center, the minute hand up
        assert_eq!(fb.pixel(Point::new(71 - 25, 96)), Some(BinaryColor::On));
        assert_eq!(fb.pixel(Point::new(71, 96 - 40)), Some(BinaryColor::On));
        assert_eq!(fb.pixel(Point::new(71 + 25, 96)), Some(BinaryColor::Off));
        // full battery dot at the right end of the track
        assert_eq!(fb.pixel(Point::new(107, 15)), Some(BinaryColor::On));
        assert_eq!(fb.pixel(Point::new(107, 16)), Some(BinaryColor::On));

        face.deinit(&mut host);
        assert!(host.live.is_empty());
        assert_eq!(
            host.released,
            [
                Resource::Layer(LayerId::Face),
                Resource::Layer(LayerId::Icon),
                Resource::Font(AssetId::DateFont),
                Resource::Bitmap(AssetId::Background),
                Resource::Bitmap(AssetId::BluetoothIcon),
                Resource::Window,
            ]
        );
    }

    #[test]
    fn test_draw_icon_layer() {
        let mut host = RecordingHost::new();
        let face = face(&mut host);
        let mut fb = FrameBuffer::new();
        face.draw(LayerId::Icon, &host, &mut fb).unwrap();

        let icon_area = Rectangle::new(ICON_BOUNDS.top_left, Size::new(9, 9));
        for y in 0..168 {
            for x in 0..144 {
                let p = Point::new(x, y);
                let expected = if icon_area.contains(p) { BinaryColor::On } else { BinaryColor::Off };
                assert_eq!(fb.pixel(p), Some(expected), "pixel {:?}", p);
            }
        }
    }
}
