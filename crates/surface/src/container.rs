use crate::html::html_for_webview;
use crate::messages::OutboundMessage;
use crate::webview::{SurfaceKind, Webview};
use crate::SurfaceError;
use pet_spec::{normalize_color, PetColor, PetSize, PetSpecification, PetType};
use std::path::Path;
use theme::{ColorThemeKind, Theme};

/// What a surface is currently showing.
///
/// `color` is stored as requested; readers get the normalized color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceState {
    pub color: PetColor,
    pub pet_type: PetType,
    pub size: PetSize,
    pub theme: Theme,
    pub theme_kind: ColorThemeKind,
}

impl SurfaceState {
    pub fn new(spec: PetSpecification, theme: Theme, theme_kind: ColorThemeKind) -> Self {
        Self {
            color: spec.color,
            pet_type: spec.pet_type,
            size: spec.size,
            theme,
            theme_kind,
        }
    }

    pub fn pet_color(&self) -> PetColor {
        normalize_color(self.color, self.pet_type)
    }

    /// The primary pet, with its color normalized.
    pub fn primary_pet(&self) -> PetSpecification {
        PetSpecification::new(self.pet_color(), self.pet_type, self.size)
    }
}

/// Contract shared by the panel and the sidebar view.
///
/// Implementors supply state access, the rendering channel and the two
/// lifecycle-specific operations. Everything else is provided.
pub trait PetSurface {
    fn kind(&self) -> SurfaceKind;

    fn state(&self) -> &SurfaceState;

    fn state_mut(&mut self) -> &mut SurfaceState;

    fn extension_path(&self) -> &Path;

    /// The rendering channel, if the host has established one.
    fn webview(&self) -> Result<&dyn Webview, SurfaceError>;

    /// Re-render from current state, subject to the surface's policy.
    fn update(&self) -> Result<(), SurfaceError>;

    /// Ask the renderer to clear all pets.
    fn reset_pets(&self) -> Result<(), SurfaceError>;

    fn pet_color(&self) -> PetColor {
        self.state().pet_color()
    }

    fn pet_type(&self) -> PetType {
        self.state().pet_type
    }

    fn pet_size(&self) -> PetSize {
        self.state().size
    }

    fn theme(&self) -> Theme {
        self.state().theme
    }

    fn theme_kind(&self) -> ColorThemeKind {
        self.state().theme_kind
    }

    fn update_pet_color(&mut self, color: PetColor) {
        self.state_mut().color = color;
    }

    fn update_pet_type(&mut self, pet_type: PetType) {
        self.state_mut().pet_type = pet_type;
    }

    fn update_pet_size(&mut self, size: PetSize) {
        self.state_mut().size = size;
    }

    fn update_theme(&mut self, theme: Theme, theme_kind: ColorThemeKind) {
        let state = self.state_mut();
        state.theme = theme;
        state.theme_kind = theme_kind;
    }

    fn post_message(&self, message: OutboundMessage) -> Result<(), SurfaceError> {
        let webview = self.webview()?;
        tracing::debug!("Posting {} to {}", message.command(), self.kind());
        webview.post_message(&message);
        Ok(())
    }

    fn throw_ball(&self) -> Result<(), SurfaceError> {
        self.post_message(OutboundMessage::ThrowBall)
    }

    /// Spawn `spec` in the renderer, then sync the renderer's size.
    fn spawn_pet(&self, spec: &PetSpecification) -> Result<(), SurfaceError> {
        self.post_message(OutboundMessage::SpawnPet {
            pet_type: spec.pet_type,
            color: spec.normalized_color(),
        })?;
        self.post_message(OutboundMessage::SetSize { size: spec.size })
    }

    fn delete_pet(&self) -> Result<(), SurfaceError> {
        self.post_message(OutboundMessage::DeletePet)
    }

    /// Unconditionally replace the document from current state.
    fn render(&self) -> Result<(), SurfaceError> {
        let webview = self.webview()?;
        tracing::debug!("Rendering {}", self.kind());
        webview.set_html(html_for_webview(webview, self.extension_path(), self.state()));
        Ok(())
    }
}
