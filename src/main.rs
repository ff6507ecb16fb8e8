use iced::widget::image::Handle;
use iced::widget::{button, column, container, pick_list, row, scrollable, text, Column, Image, Space};
use iced::{Alignment, Element, Length, Size, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod config;
mod error;
mod gradio;
mod notify;
mod preview;
mod state;
mod tryon;

use config::Config;
use gradio::GradioClient;
use notify::{DialogNotifier, Notifier};
use preview::Preview;
use state::{Category, Selection, Slot};

/// Window title
const TITLE: &str = "Photo Uploader and Processor";

/// Extensions offered by the file picker
const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "png", "jpeg"];

/// Main application state
struct TryOn {
    config: Config,
    /// Long-lived handle to the remote service
    client: GradioClient,
    /// Picked files and category
    selection: Selection,
    person_preview: Option<Preview>,
    garment_preview: Option<Preview>,
    result_preview: Option<Preview>,
    /// A request is in flight
    processing: bool,
    /// Status message to display to the user
    status: String,
    notifier: Box<dyn Notifier>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User picked a garment category
    CategorySelected(Category),
    /// User clicked one of the "Choose ... Image" buttons
    Pick(Slot),
    /// Background decode of a picked file finished
    PreviewLoaded(Slot, PathBuf, Result<Preview, String>),
    /// User clicked "Process with AI"
    Submit,
    /// The remote call finished
    ProcessComplete(Result<Preview, String>),
}

impl TryOn {
    /// Create a new instance of the application
    fn new(config: Config, notifier: Box<dyn Notifier>) -> error::Result<Self> {
        let client = GradioClient::from_config(&config)?;
        tracing::info!(service = client.root(), api = %config.api_name, "Try-on client ready");

        Ok(TryOn {
            config,
            client,
            selection: Selection::new(),
            person_preview: None,
            garment_preview: None,
            result_preview: None,
            processing: false,
            status: "Choose a person image and a garment image.".to_string(),
            notifier,
        })
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::CategorySelected(category) => {
                tracing::debug!(%category, "Category selected");
                self.selection.category = category;
                Task::none()
            }
            Message::Pick(slot) => {
                // Show the native file picker dialog
                let picked = FileDialog::new()
                    .set_title(slot.button_label())
                    .add_filter("Image files", &IMAGE_EXTENSIONS)
                    .pick_file();

                match picked {
                    Some(path) => self.select(slot, path),
                    // Cancelled: keep whatever was picked before
                    None => Task::none(),
                }
            }
            Message::PreviewLoaded(slot, path, result) => {
                // A newer pick for this slot supersedes the one that finished
                if self.selection.get(slot) != Some(path.as_path()) {
                    return Task::none();
                }

                match result {
                    Ok(preview) => *self.preview_mut(slot) = Some(preview),
                    Err(e) => self.report(format!("Failed to display image: {}", e)),
                }
                Task::none()
            }
            Message::Submit => self.submit(),
            Message::ProcessComplete(result) => {
                self.processing = false;

                match result {
                    Ok(preview) => {
                        self.result_preview = Some(preview);
                        self.status = "Done.".to_string();
                    }
                    Err(e) => {
                        self.status = "Processing failed.".to_string();
                        self.report(format!("An error occurred: {}", e));
                    }
                }
                Task::none()
            }
        }
    }

    /// Store a picked file and start decoding its preview
    fn select(&mut self, slot: Slot, path: PathBuf) -> Task<Message> {
        tracing::info!(?slot, path = %path.display(), "Image selected");

        self.selection.set(slot, path.clone());
        *self.preview_mut(slot) = None;
        if self.selection.is_ready() {
            self.status = "Ready.".to_string();
        }

        let size = self.config.preview_size;
        Task::perform(preview::load_file(path.clone(), size), move |result| {
            Message::PreviewLoaded(slot, path.clone(), result.map_err(|e| e.to_string()))
        })
    }

    /// Validate the selection and launch the remote call
    fn submit(&mut self) -> Task<Message> {
        if self.processing {
            return Task::none();
        }

        let request = match self.selection.request(self.config.sampling) {
            Ok(request) => request,
            Err(e) => {
                self.report(format!("An error occurred: {}", e));
                return Task::none();
            }
        };

        self.processing = true;
        self.status = "Processing...".to_string();

        Task::perform(
            tryon::run(
                self.client.clone(),
                self.config.api_name.clone(),
                request,
                self.config.preview_size,
            ),
            |result| Message::ProcessComplete(result.map_err(|e| e.to_string())),
        )
    }

    /// Submit is only possible with two existing files and nothing in flight
    fn can_submit(&self) -> bool {
        !self.processing && self.selection.is_ready()
    }

    fn report(&mut self, message: String) {
        self.notifier.error(&message);
    }

    fn preview(&self, slot: Slot) -> Option<&Preview> {
        match slot {
            Slot::Person => self.person_preview.as_ref(),
            Slot::Garment => self.garment_preview.as_ref(),
        }
    }

    fn preview_mut(&mut self, slot: Slot) -> &mut Option<Preview> {
        match slot {
            Slot::Person => &mut self.person_preview,
            Slot::Garment => &mut self.garment_preview,
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let category = column![
            text("Select Garment Category").size(14),
            pick_list(
                Category::ALL,
                Some(self.selection.category),
                Message::CategorySelected,
            ),
        ]
        .spacing(5)
        .align_x(Alignment::Center);

        let inputs = row![self.slot_column(Slot::Person), self.slot_column(Slot::Garment)]
            .spacing(10);

        let submit_label = if self.processing { "Processing..." } else { "Process with AI" };
        let submit = button(text(submit_label).size(14))
            .on_press_maybe(self.can_submit().then_some(Message::Submit))
            .padding(10);

        let content: Column<Message> = column![
            category,
            inputs,
            submit,
            text("Output Image").size(14),
            self.preview_view(self.result_preview.as_ref()),
            text(&self.status).size(12),
        ]
        .spacing(20)
        .padding(20)
        .align_x(Alignment::Center);

        scrollable(
            container(content)
                .width(Length::Fill)
                .center_x(Length::Fill),
        )
        .into()
    }

    fn slot_column(&self, slot: Slot) -> Column<Message> {
        column![
            text(self.selection.label(slot)).size(14),
            button(text(slot.button_label()).size(12))
                .on_press(Message::Pick(slot))
                .padding(8),
            self.preview_view(self.preview(slot)),
        ]
        .spacing(10)
        .width(Length::FillPortion(1))
        .align_x(Alignment::Center)
    }

    fn preview_view(&self, preview: Option<&Preview>) -> Element<Message> {
        match preview {
            Some(preview) => Image::<Handle>::new(preview.handle.clone())
                .width(preview.width as f32)
                .height(preview.height as f32)
                .into(),
            None => Space::with_height(self.config.preview_size as f32).into(),
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tryon_studio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> iced::Result {
    init_tracing();

    let config = Config::load();
    let app = match TryOn::new(config, Box::new(DialogNotifier)) {
        Ok(app) => app,
        Err(e) => {
            DialogNotifier.error(&format!("Failed to start: {}", e));
            std::process::exit(1);
        }
    };

    iced::application(TITLE, TryOn::update, TryOn::view)
        .theme(TryOn::theme)
        .window_size(Size::new(360.0, 800.0))
        .centered()
        .run_with(move || (app, Task::none()))
}
