//! Image panel: one open image, drawn from its packed display buffer

use iced::widget::image::{FilterMethod, Handle};
use iced::widget::scrollable::{Direction, Scrollbar};
use iced::widget::{image, mouse_area, scrollable};
use iced::{ContentFit, Element, Length, Point};

use raster_viewer::pixel::packed_to_rgba8;
use raster_viewer::ImageData;

use crate::Message;

pub const MIN_ZOOM: f32 = 0.125;
pub const MAX_ZOOM: f32 = 16.0;

/// An image open in the viewer
pub struct Document {
    /// Tab label
    pub title: String,
    pub image: ImageData,
    /// Zoom level (1.0 = 100%)
    pub zoom: f32,
    /// Pixel under the mouse as (col, row)
    cursor: Option<(usize, usize)>,
    /// Rendered copy of `image.display_buffer()`
    handle: Handle,
}

impl Document {
    pub fn new(title: String, image: ImageData, zoom: f32) -> Self {
        let handle = render(&image);
        Self {
            title,
            image,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            cursor: None,
            handle,
        }
    }

    /// Rebuild the rendered image after the display buffer changed
    pub fn refresh(&mut self) {
        self.handle = render(&self.image);
    }

    pub fn zoom_by(&mut self, factor: f32) {
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Mirror the display samples around the middle of the original range
    /// (`v -> min + max - v`) and show the result without committing it.
    /// Results outside `i32` saturate.
    pub fn invert(&mut self) {
        let pivot = i64::from(self.image.min()) + i64::from(self.image.max());
        for v in self.image.display_samples_mut() {
            *v = (pivot - i64::from(*v)).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        }
        self.image.repack();
        self.image.set_modified(true);
        self.refresh();
    }

    /// `point` is relative to the top-left corner of the drawn image
    pub fn track_cursor(&mut self, point: Point) {
        self.cursor = if point.x < 0.0 || point.y < 0.0 {
            None
        } else {
            Some(((point.x / self.zoom) as usize, (point.y / self.zoom) as usize))
        };
    }

    pub fn clear_cursor(&mut self) {
        self.cursor = None;
    }

    /// Position and original value(s) of the pixel under the mouse
    pub fn pixel_report(&self) -> Option<String> {
        let (col, row) = self.cursor?;
        let values = self.image.pixel(row, col).ok()?;
        Some(match values.as_slice() {
            [gray] => format!("({}, {})  gray={}", col, row, gray),
            [r, g, b] => format!("({}, {})  r={} g={} b={}", col, row, r, g, b),
            _ => format!("({}, {})", col, row),
        })
    }

    pub fn view(&self) -> Element<'_, Message> {
        let width = self.image.width() as f32 * self.zoom;
        let height = self.image.height() as f32 * self.zoom;

        let picture = image(self.handle.clone())
            .width(Length::Fixed(width))
            .height(Length::Fixed(height))
            .content_fit(ContentFit::Fill)
            .filter_method(FilterMethod::Nearest);

        let tracked = mouse_area(picture)
            .on_move(Message::CursorMoved)
            .on_exit(Message::CursorLeft);

        scrollable(tracked)
            .direction(Direction::Both {
                vertical: Scrollbar::default(),
                horizontal: Scrollbar::default(),
            })
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

fn render(image: &ImageData) -> Handle {
    Handle::from_rgba(
        image.width() as u32,
        image.height() as u32,
        packed_to_rgba8(image.display_buffer()),
    )
}
