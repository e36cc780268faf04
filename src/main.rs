use iced::widget::{button, column, container, row, text, Row};
use iced::{Alignment, Element, Length, Point, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use tokio::task;

use raster_viewer::loader::{self, Loaded, PNM_EXTENSIONS};
use raster_viewer::state::Preferences;

mod ui;

use ui::panel::Document;

/// Extensions offered by the open dialog besides the netpbm family
const BITMAP_EXTENSIONS: [&str; 8] = ["bmp", "gif", "ico", "jpg", "jpeg", "png", "tif", "tiff"];

/// Main application state
struct Viewer {
    /// Open images, shown as tabs
    documents: Vec<Document>,
    /// Index of the visible document
    active: Option<usize>,
    preferences: Preferences,
    /// Where preferences are saved (None if no config directory exists)
    preferences_path: Option<PathBuf>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked "Open"
    Open,
    /// Background load finished
    Loaded(PathBuf, Result<Loaded, String>),
    /// User picked a tab
    Select(usize),
    /// Open a copy of the active image built from its original data
    Duplicate,
    /// Commit display edits of the active image
    MakePermanent,
    /// Invert the display samples of the active image
    Invert,
    ZoomIn,
    ZoomOut,
    /// Close the active image
    Close,
    CursorMoved(Point),
    CursorLeft,
}

impl Viewer {
    /// Create the viewer and start loading any files named on the command line
    fn new(paths: Vec<PathBuf>) -> (Self, Task<Message>) {
        let preferences_path = Preferences::default_path();
        let preferences = match preferences_path.as_deref().map(Preferences::load_from) {
            Some(Ok(preferences)) => preferences,
            Some(Err(e)) => {
                log::warn!("Ignoring preferences: {}", e);
                Preferences::default()
            }
            None => Preferences::default(),
        };

        let status = if paths.is_empty() {
            "Ready. Use Open to load an image.".to_string()
        } else {
            format!("Loading {} file(s). Please wait.", paths.len())
        };

        let viewer = Viewer {
            documents: Vec::new(),
            active: None,
            preferences,
            preferences_path,
            status,
        };
        let tasks = Task::batch(paths.into_iter().map(load_task));

        (viewer, tasks)
    }

    fn title(&self) -> String {
        match self.active_document() {
            Some(doc) => format!("Raster Viewer: {}", doc.title),
            None => "Raster Viewer: <empty>".to_string(),
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Open => {
                let extensions: Vec<&str> = PNM_EXTENSIONS
                    .iter()
                    .chain(BITMAP_EXTENSIONS.iter())
                    .copied()
                    .collect();
                let mut dialog = FileDialog::new()
                    .set_title("Open Image")
                    .add_filter("image files", extensions.as_slice());
                if let Some(dir) = &self.preferences.last_directory {
                    dialog = dialog.set_directory(dir);
                }

                match dialog.pick_files() {
                    Some(paths) if !paths.is_empty() => {
                        self.status = format!("Loading {} file(s). Please wait.", paths.len());
                        Task::batch(paths.into_iter().map(load_task))
                    }
                    _ => Task::none(),
                }
            }
            Message::Loaded(path, Ok(loaded)) => {
                self.preferences.remember_file(&path);
                self.save_preferences();

                let Loaded { image, advisories } = loaded;
                self.status = if advisories.is_empty() {
                    format!(
                        "{}: {}x{} {}, min={}, max={}",
                        path.display(),
                        image.width(),
                        image.height(),
                        if image.is_color() { "color" } else { "gray" },
                        image.min(),
                        image.max()
                    )
                } else {
                    let warnings: Vec<String> = advisories.iter().map(ToString::to_string).collect();
                    format!("Warning: {}", warnings.join(" "))
                };

                let title = path
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                self.open_document(Document::new(title, image, self.preferences.zoom));
                Task::none()
            }
            Message::Loaded(path, Err(e)) => {
                log::error!("Failed to load {}: {}", path.display(), e);
                self.status = format!("Failed to load {}: {}", path.display(), e);
                Task::none()
            }
            Message::Select(index) => {
                if index < self.documents.len() {
                    self.active = Some(index);
                }
                Task::none()
            }
            Message::Duplicate => {
                let copy = self.active_document().map(|doc| {
                    let title = format!("{} (copy)", doc.title);
                    (title, doc.zoom, doc.image.clone_original())
                });
                match copy {
                    Some((title, zoom, Ok(image))) => {
                        self.open_document(Document::new(title, image, zoom))
                    }
                    Some((_, _, Err(e))) => self.status = format!("Clone failed: {}", e),
                    None => {}
                }
                Task::none()
            }
            Message::MakePermanent => {
                if let Some(doc) = self.active_document_mut() {
                    doc.image.make_permanent();
                    let status = format!(
                        "Committed {}: min={}, max={}",
                        doc.title,
                        doc.image.min(),
                        doc.image.max()
                    );
                    self.status = status;
                }
                Task::none()
            }
            Message::Invert => {
                if let Some(doc) = self.active_document_mut() {
                    doc.invert();
                }
                Task::none()
            }
            Message::ZoomIn => {
                self.zoom_active(2.0);
                Task::none()
            }
            Message::ZoomOut => {
                self.zoom_active(0.5);
                Task::none()
            }
            Message::Close => {
                if let Some(index) = self.active {
                    let closed = self.documents.remove(index);
                    log::debug!("Closed {}", closed.title);
                    self.active = if self.documents.is_empty() {
                        None
                    } else {
                        Some(index.min(self.documents.len() - 1))
                    };
                }
                Task::none()
            }
            Message::CursorMoved(point) => {
                if let Some(doc) = self.active_document_mut() {
                    doc.track_cursor(point);
                }
                Task::none()
            }
            Message::CursorLeft => {
                if let Some(doc) = self.active_document_mut() {
                    doc.clear_cursor();
                }
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let has_image = self.active.is_some();
        let action = |label: &'static str, message: Message| {
            button(text(label))
                .on_press_maybe(has_image.then_some(message))
                .padding(8)
        };

        let toolbar = row![
            button(text("Open")).on_press(Message::Open).padding(8),
            action("Clone", Message::Duplicate),
            action("Make Permanent", Message::MakePermanent),
            action("Invert", Message::Invert),
            action("Zoom -", Message::ZoomOut),
            action("Zoom +", Message::ZoomIn),
            action("Close", Message::Close),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let tabs = self
            .documents
            .iter()
            .enumerate()
            .fold(Row::new().spacing(4), |tabs, (index, doc)| {
                let label = if doc.image.is_modified() {
                    format!("{} *", doc.title)
                } else {
                    doc.title.clone()
                };
                let tab = button(text(label)).padding(4);
                tabs.push(if self.active == Some(index) {
                    tab
                } else {
                    tab.on_press(Message::Select(index))
                })
            });

        let body: Element<Message> = match self.active_document() {
            Some(doc) => doc.view(),
            None => container(text("No image. Use Open to load one.").size(16))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
        };

        let readout = self
            .active_document()
            .and_then(Document::pixel_report)
            .unwrap_or_default();

        column![
            toolbar,
            tabs,
            body,
            row![text(&self.status).size(14), text(readout).size(14)].spacing(24),
        ]
        .spacing(12)
        .padding(16)
        .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn active_document(&self) -> Option<&Document> {
        self.active.and_then(|index| self.documents.get(index))
    }

    fn active_document_mut(&mut self) -> Option<&mut Document> {
        self.active.and_then(|index| self.documents.get_mut(index))
    }

    fn open_document(&mut self, document: Document) {
        self.documents.push(document);
        self.active = Some(self.documents.len() - 1);
    }

    /// Zoom the active image; the new level becomes the default for new images
    fn zoom_active(&mut self, factor: f32) {
        if let Some(doc) = self.active_document_mut() {
            doc.zoom_by(factor);
            let zoom = doc.zoom;
            self.preferences.zoom = zoom;
            self.save_preferences();
        }
    }

    fn save_preferences(&self) {
        if let Some(path) = &self.preferences_path {
            if let Err(e) = self.preferences.save_to(path) {
                log::warn!("{}", e);
            }
        }
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Every argument is an image to open
    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();

    iced::application(Viewer::title, Viewer::update, Viewer::view)
        .theme(Viewer::theme)
        .centered()
        .run_with(move || Viewer::new(paths))
}

fn load_task(path: PathBuf) -> Task<Message> {
    Task::perform(load_async(path.clone()), move |result| {
        Message::Loaded(path.clone(), result)
    })
}

/// Load an image off the UI thread
///
/// Decoding is CPU-bound and blocking, so it runs on tokio's blocking pool.
async fn load_async(path: PathBuf) -> Result<Loaded, String> {
    task::spawn_blocking(move || loader::load(&path).map_err(|e| e.to_string()))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}
