//! Executes draw commands on a 1-bit draw target

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Point, Size},
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::BinaryColor,
    primitives::{Circle, Line, Polyline, Primitive, PrimitiveStyle, Rectangle},
    Drawable,
};
use embedded_text::{
    alignment::HorizontalAlignment,
    style::{HeightMode, TextBoxStyleBuilder, VerticalOverdraw},
    TextBox,
};
use heapless::Vec;

use super::{bitmap::Bitmap, hand::OUTLINE_POINTS, DrawCommand};
use crate::host::AssetId;

/// Resources loaded at startup and kept for the lifetime of the face
#[derive(Debug, Clone, Copy)]
pub struct FaceAssets {
    pub background: Bitmap<'static>,
    pub icon: Bitmap<'static>,
    pub font: &'static MonoFont<'static>,
}

impl FaceAssets {
    fn bitmap(&self, id: AssetId) -> Option<&Bitmap<'static>> {
        match id {
            AssetId::Background => Some(&self.background),
            AssetId::BluetoothIcon => Some(&self.icon),
            AssetId::DateFont => None,
        }
    }
}

/// Draw all `commands` in order
pub fn paint<D>(commands: &[DrawCommand], assets: &FaceAssets, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    for command in commands {
        paint_command(command, assets, target)?;
    }
    Ok(())
}

fn paint_command<D>(command: &DrawCommand, assets: &FaceAssets, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    match command {
        DrawCommand::Bitmap { asset, origin } => {
            if let Some(bitmap) = assets.bitmap(*asset) {
                draw_bitmap(bitmap, *origin, target)?;
            }
        }
        DrawCommand::Text { text, bounds, color } => {
            let character_style = MonoTextStyle::new(assets.font, *color);
            let textbox_style = TextBoxStyleBuilder::new()
                .height_mode(HeightMode::Exact(VerticalOverdraw::Hidden))
                .alignment(HorizontalAlignment::Center)
                .build();
            TextBox::with_textbox_style(text, *bounds, character_style, textbox_style).draw(target)?;
        }
        DrawCommand::Line { start, end, color } => {
            Line::new(*start, *end)
                .into_styled(PrimitiveStyle::with_stroke(*color, 1))
                .draw(target)?;
        }
        DrawCommand::FillCircle { center, radius, color } => {
            Circle::with_center(*center, 2 * radius + 1)
                .into_styled(PrimitiveStyle::with_fill(*color))
                .draw(target)?;
        }
        DrawCommand::StrokeCircle { center, radius, color } => {
            Circle::with_center(*center, 2 * radius + 1)
                .into_styled(PrimitiveStyle::with_stroke(*color, 1))
                .draw(target)?;
        }
        DrawCommand::FillPath { hand, color } => fill_polygon(&hand.points(), *color, target)?,
        DrawCommand::OutlinePath { hand, color } => outline_polygon(&hand.points(), *color, target)?,
    }
    Ok(())
}

/// Blit `bitmap` with its top left corner at `origin`
pub fn draw_bitmap<D>(bitmap: &Bitmap<'_>, origin: Point, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.fill_contiguous(&Rectangle::new(origin, bitmap.size()), bitmap.colors())
}

/// Closed outline through `points`
pub fn outline_polygon<D>(points: &[Point], color: BinaryColor, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let mut closed: Vec<Point, { OUTLINE_POINTS + 1 }> = Vec::new();
    for point in points.iter().chain(points.first()) {
        if closed.push(*point).is_err() {
            break;
        }
    }
    Polyline::new(&closed)
        .into_styled(PrimitiveStyle::with_stroke(color, 1))
        .draw(target)
}

/// Even-odd scanline fill of the polygon through `points`.
///
/// Edges are sampled at pixel rows, half-open at the bottom so shared
/// vertices are counted once.
pub fn fill_polygon<D>(points: &[Point], color: BinaryColor, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let (Some(top), Some(bottom)) = (
        points.iter().map(|p| p.y).min(),
        points.iter().map(|p| p.y).max(),
    ) else {
        return Ok(());
    };

    for y in top..bottom {
        let mut crossings: Vec<i32, OUTLINE_POINTS> = Vec::new();
        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            let (upper, lower) = if a.y <= b.y { (*a, b) } else { (b, *a) };
            if y < upper.y || y >= lower.y {
                continue;
            }
            let x = upper.x + (y - upper.y) * (lower.x - upper.x) / (lower.y - upper.y);
            if crossings.push(x).is_err() {
                break;
            }
        }
        crossings.sort_unstable();

        for span in crossings.chunks_exact(2) {
            let (left, right) = (span[0], span[1]);
            let row = Rectangle::new(Point::new(left, y), Size::new((right - left + 1) as u32, 1));
            target.fill_solid(&row, color)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{
            BATTERY_DOT_RADIUS, BATTERY_TRACK_Y, CANVAS_H, CANVAS_W, DATE_TEXT_BOUNDS,
        },
        date::date_text,
        ui::framebuffer::FrameBuffer,
    };
    use chrono::NaiveDate;

    fn lit(fb: &FrameBuffer) -> usize {
        fb.colors().filter(|c| *c == BinaryColor::On).count()
    }

    #[test]
    fn test_fill_square() {
        let mut fb = FrameBuffer::new();
        let square = [
            Point::new(10, 10),
            Point::new(19, 10),
            Point::new(19, 20),
            Point::new(10, 20),
        ];
        fill_polygon(&square, BinaryColor::On, &mut fb).unwrap();
        // rows 10..20, columns 10..=19
        assert_eq!(lit(&fb), 100);
        assert_eq!(fb.pixel(Point::new(10, 10)), Some(BinaryColor::On));
        assert_eq!(fb.pixel(Point::new(19, 19)), Some(BinaryColor::On));
        assert_eq!(fb.pixel(Point::new(15, 20)), Some(BinaryColor::Off));
    }

    #[test]
    fn test_fill_degenerate() {
        let mut fb = FrameBuffer::new();
        fill_polygon(&[], BinaryColor::On, &mut fb).unwrap();
        fill_polygon(&[Point::new(5, 5), Point::new(50, 5)], BinaryColor::On, &mut fb).unwrap();
        assert_eq!(lit(&fb), 0);
    }

    #[test]
    fn test_outline_is_closed() {
        let mut fb = FrameBuffer::new();
        let triangle = [Point::new(10, 10), Point::new(30, 10), Point::new(10, 30)];
        outline_polygon(&triangle, BinaryColor::On, &mut fb).unwrap();
        // closing edge from the last point back to the first
        assert_eq!(fb.pixel(Point::new(10, 20)), Some(BinaryColor::On));
        assert_eq!(fb.pixel(Point::new(20, 10)), Some(BinaryColor::On));
        assert_eq!(fb.pixel(Point::new(15, 15)), Some(BinaryColor::Off));
    }

    #[test]
    fn test_draw_bitmap_at_origin() {
        let data = [0xFF, 0x80, 0x00, 0x00];
        let bitmap = Bitmap::new(&data, Size::new(9, 2)).unwrap();
        let mut fb = FrameBuffer::new();
        draw_bitmap(&bitmap, Point::new(67, 92), &mut fb).unwrap();
        assert_eq!(lit(&fb), 9);
        assert_eq!(fb.pixel(Point::new(67, 92)), Some(BinaryColor::On));
        assert_eq!(fb.pixel(Point::new(75, 92)), Some(BinaryColor::On));
        assert_eq!(fb.pixel(Point::new(67, 93)), Some(BinaryColor::Off));
    }

    static BLANK: [u8; 1] = [0];

    /// First lit row, last lit row and number of lit rows
    fn lit_rows(fb: &FrameBuffer) -> (i32, i32, usize) {
        let rows: std::vec::Vec<i32> = (0..CANVAS_H as i32)
            .filter(|y| (0..CANVAS_W as i32).any(|x| fb.pixel(Point::new(x, *y)) == Some(BinaryColor::On)))
            .collect();
        (rows[0], rows[rows.len() - 1], rows.len())
    }

    fn paint_date(bounds: Rectangle) -> FrameBuffer {
        let blank = Bitmap::new(&BLANK, Size::new(1, 1)).unwrap();
        let assets = FaceAssets {
            background: blank,
            icon: blank,
            font: &profont::PROFONT_14_POINT,
        };
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let command = DrawCommand::Text {
            text: date_text(&date),
            bounds,
            color: BinaryColor::On,
        };
        let mut fb = FrameBuffer::new();
        paint(&[command], &assets, &mut fb).unwrap();
        fb
    }

    #[test]
    fn test_date_line_not_clipped() {
        let (top, bottom, rows) = lit_rows(&paint_date(DATE_TEXT_BOUNDS));
        let free = Rectangle::new(Point::new(0, 40), DATE_TEXT_BOUNDS.size);
        let (free_top, _, free_rows) = lit_rows(&paint_date(free));

        // same glyph rows as with room to spare above
        assert_eq!(rows, free_rows);
        assert_eq!(top - DATE_TEXT_BOUNDS.top_left.y, free_top - 40);
        assert!(top > 0);
        // and clear of the battery dot
        assert!(bottom < BATTERY_TRACK_Y - BATTERY_DOT_RADIUS as i32);
    }
}
