//! Console state and its transitions
//!
//! Every change goes through [`ConsoleState::apply`], which consumes the old
//! state and returns the new one. Side effects (network, capture, files)
//! live in [`super::Console`].

use serde::{Deserialize, Serialize};

use crate::export::{CertificateRequest, FileFormat};
use crate::models::DownloadEvent;

pub const MISSING_FIELDS_PROMPT: &str = "الشهادة جاهزة تقريباً! لمسة أخيرة بسيطة: يرجى إضافة اسم صاحب الإنجاز والمدرسة التي يمثلها لتكتمل فرحة التكريم.";
pub const WRONG_PASSWORD: &str = "كلمة المرور غير صحيحة";
pub const STATISTICS_FAILED: &str = "فشل في جلب الإحصائيات. يرجى المحاولة مرة أخرى.";
pub const RESET_FAILED: &str = "فشل في إعادة تعيين الإحصائيات.";

pub const DEFAULT_FONT_SIZE: u32 = 19;
pub const DEFAULT_COLOR: &str = "#000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayId {
    Name,
    School,
}

/// Position in percent of the certificate's width / height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub text: String,
    pub position: Position,
    pub font_size: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlays {
    pub name: Overlay,
    pub school: Overlay,
}

impl Default for Overlays {
    fn default() -> Self {
        let overlay = |x, y| Overlay {
            text: String::new(),
            position: Position { x, y },
            font_size: DEFAULT_FONT_SIZE,
            color: DEFAULT_COLOR.to_string(),
        };

        Self {
            name: overlay(67.0, 37.5),
            school: overlay(67.0, 43.0),
        }
    }
}

impl Overlays {
    fn get_mut(&mut self, id: OverlayId) -> &mut Overlay {
        match id {
            OverlayId::Name => &mut self.name,
            OverlayId::School => &mut self.school,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Password,
    ConfirmReset,
    Alert(String),
}

#[derive(Debug, Clone)]
pub enum ConsoleEvent {
    TemplateSelected(String),
    OverlayTextChanged { id: OverlayId, text: String },
    OverlayColorChanged { id: OverlayId, color: String },
    GlobalColorChanged(String),
    AdminToggled,
    /// Outcome of the credential check
    PasswordSubmitted { accepted: bool },
    ResetRequested,
    ResetConfirmed,
    HistoryCleared,
    ResetFailed,
    StatisticsLoaded(Vec<DownloadEvent>),
    StatisticsFailed,
    ExportStarted,
    ExportFinished,
    ExportRejected,
    ModalDismissed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleState {
    pub template_id: String,
    pub overlays: Overlays,
    pub loading: bool,
    pub show_admin: bool,
    pub admin_authenticated: bool,
    /// Open modals, topmost last
    pub modals: Vec<Modal>,
    pub history: Vec<DownloadEvent>,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl ConsoleState {
    pub fn new(template_id: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            overlays: Overlays::default(),
            loading: false,
            show_admin: false,
            admin_authenticated: false,
            modals: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn apply(mut self, event: ConsoleEvent) -> Self {
        match event {
            ConsoleEvent::TemplateSelected(id) => {
                self.template_id = id;
                self.overlays = Overlays::default();
            }
            ConsoleEvent::OverlayTextChanged { id, text } => {
                self.overlays.get_mut(id).text = text;
            }
            ConsoleEvent::OverlayColorChanged { id, color } => {
                self.overlays.get_mut(id).color = color;
            }
            ConsoleEvent::GlobalColorChanged(color) => {
                self.overlays.name.color = color.clone();
                self.overlays.school.color = color;
            }
            ConsoleEvent::AdminToggled => {
                if self.admin_authenticated {
                    self.show_admin = !self.show_admin;
                } else {
                    self.modals.push(Modal::Password);
                }
            }
            ConsoleEvent::PasswordSubmitted { accepted: true } => {
                self.admin_authenticated = true;
                self.show_admin = true;
                self.modals.retain(|m| *m != Modal::Password);
            }
            ConsoleEvent::PasswordSubmitted { accepted: false } => {
                self.modals.push(Modal::Alert(WRONG_PASSWORD.to_string()));
            }
            ConsoleEvent::ResetRequested => {
                self.modals.push(Modal::ConfirmReset);
            }
            ConsoleEvent::ResetConfirmed => {
                self.modals.retain(|m| *m != Modal::ConfirmReset);
            }
            ConsoleEvent::HistoryCleared => {
                self.history.clear();
            }
            ConsoleEvent::ResetFailed => {
                self.modals.push(Modal::Alert(RESET_FAILED.to_string()));
            }
            ConsoleEvent::StatisticsLoaded(history) => {
                self.history = history;
            }
            ConsoleEvent::StatisticsFailed => {
                self.modals.push(Modal::Alert(STATISTICS_FAILED.to_string()));
            }
            ConsoleEvent::ExportStarted => self.loading = true,
            ConsoleEvent::ExportFinished => self.loading = false,
            ConsoleEvent::ExportRejected => {
                self.modals.push(Modal::Alert(MISSING_FIELDS_PROMPT.to_string()));
            }
            ConsoleEvent::ModalDismissed => {
                self.modals.pop();
            }
        }
        self
    }

    /// The admin table needs data once the view is open and unlocked.
    pub fn wants_statistics(&self) -> bool {
        self.show_admin && self.admin_authenticated
    }

    pub fn top_modal(&self) -> Option<&Modal> {
        self.modals.last()
    }

    pub fn certificate_request(&self, format: FileFormat) -> CertificateRequest {
        CertificateRequest {
            template_id: self.template_id.clone(),
            student_name: self.overlays.name.text.clone(),
            school_name: self.overlays.school.text.clone(),
            format,
        }
    }
}
