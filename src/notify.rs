//! User-facing error reporting
//!
//! Every failure ends in one modal dialog. The dialog sits behind a trait
//! so the window logic can be exercised without a display.

use rfd::{MessageButtons, MessageDialog, MessageLevel};

/// Something that can tell the user a thing went wrong
pub trait Notifier {
    fn error(&self, message: &str);
}

/// Native modal error dialog
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogNotifier;

impl Notifier for DialogNotifier {
    fn error(&self, message: &str) {
        tracing::error!("{}", message);
        let _ = MessageDialog::new()
            .set_level(MessageLevel::Error)
            .set_title("Error")
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}

/// Collects messages instead of showing them
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    messages: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
}

#[cfg(test)]
impl RecordingNotifier {
    /// Everything reported so far, shared with the notifier
    pub fn messages(&self) -> std::rc::Rc<std::cell::RefCell<Vec<String>>> {
        self.messages.clone()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
