//! Board view: the grid of picture frames

use iced::widget::{button, container, image, svg, text, tooltip};
use iced::{Element, Length};
use iced_aw::Wrap;

use frame_flip::state::data::ImageEntry;

use crate::Message;

/// Widget handle for one frame, built once per batch instead of per redraw
#[derive(Debug, Clone)]
pub enum FrameHandle {
    Raster(image::Handle),
    Vector(svg::Handle),
}

impl FrameHandle {
    pub fn from_entry(entry: &ImageEntry) -> Self {
        if entry.source.is_svg() {
            Self::Vector(svg::Handle::from_memory(entry.source.bytes.clone()))
        } else {
            Self::Raster(image::Handle::from_bytes(entry.source.bytes.clone()))
        }
    }
}

/// Lay out every frame, wrapping to the window width
pub fn frame_grid<'a>(entries: &'a [ImageEntry], handles: &'a [FrameHandle], size: f32) -> Element<'a, Message> {
    let frames: Vec<Element<'a, Message>> = entries
        .iter()
        .zip(handles)
        .enumerate()
        .map(|(index, (entry, handle))| picture_frame(index, entry, handle, size))
        .collect();

    Wrap::with_elements(frames)
        .spacing(16.0)
        .line_spacing(16.0)
        .into()
}

/// One clickable frame: the picture when revealed, a card back otherwise
fn picture_frame<'a>(index: usize, entry: &'a ImageEntry, handle: &FrameHandle, size: f32) -> Element<'a, Message> {
    let face: Element<'a, Message> = if entry.revealed {
        match handle {
            FrameHandle::Raster(handle) => image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            FrameHandle::Vector(handle) => svg(handle.clone())
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
        }
    } else {
        container(text("?").size(size / 3.0))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    };

    let frame = button(face)
        .width(Length::Fixed(size))
        .height(Length::Fixed(size))
        .padding(8)
        .on_press(Message::ToggleFrame(index));

    // Display name doubles as alt text
    tooltip(frame, text(&entry.display_name).size(14), tooltip::Position::Bottom).into()
}
