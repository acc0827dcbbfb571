//! Renderer document generation.
//!
//! [`render_html`] is pure: every URI and the nonce come in through
//! [`ContentParams`]. [`html_for_webview`] resolves those against a live
//! webview.

use crate::container::SurfaceState;
use crate::webview::Webview;
use pet_spec::{PetColor, PetSize, PetType};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::path::Path;
use theme::{ColorThemeKind, Theme};

pub const MEDIA_DIR: &str = "media";
pub const MAIN_SCRIPT: &str = "main-bundle.js";
pub const RESET_CSS: &str = "reset.css";
pub const PETS_CSS: &str = "pets.css";

const NONCE_LEN: usize = 32;

/// Everything the document embeds.
#[derive(Debug, Clone)]
pub struct ContentParams<'a> {
    pub csp_source: &'a str,
    pub script_uri: &'a str,
    pub styles_reset_uri: &'a str,
    pub styles_main_uri: &'a str,
    pub base_pet_uri: &'a str,
    pub theme: Theme,
    pub theme_kind: ColorThemeKind,
    pub color: PetColor,
    pub size: PetSize,
    pub pet_type: PetType,
}

/// 32 random ASCII letters and digits.
pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}

/// Build the renderer document.
///
/// The content security policy forbids everything by default, allows styles
/// from the webview's own source, images from that source or https, and only
/// scripts carrying `nonce`.
pub fn render_html(params: &ContentParams<'_>, nonce: &str) -> String {
    let ContentParams {
        csp_source,
        script_uri,
        styles_reset_uri,
        styles_main_uri,
        base_pet_uri,
        theme,
        theme_kind,
        color,
        size,
        pet_type,
    } = params;

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta http-equiv="Content-Security-Policy" content="default-src 'none'; style-src {csp_source}; img-src {csp_source} https:; script-src 'nonce-{nonce}';">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <link href="{styles_reset_uri}" rel="stylesheet">
    <link href="{styles_main_uri}" rel="stylesheet">
    <title>VS Code Pets</title>
</head>
<body>
    <canvas id="petCanvas"></canvas>
    <div id="petsContainer"></div>
    <div id="foreground"></div>
    <script nonce="{nonce}" src="{script_uri}"></script>
    <script nonce="{nonce}">petApp.petPanelApp("{base_pet_uri}", "{theme}", {kind}, "{color}", "{size}", "{pet_type}");</script>
</body>
</html>"#,
        kind = theme_kind.as_number(),
    )
}

/// Render `state` for `webview`, with a fresh nonce.
pub fn html_for_webview(
    webview: &dyn Webview,
    extension_path: &Path,
    state: &SurfaceState,
) -> String {
    let media = extension_path.join(MEDIA_DIR);
    let csp_source = webview.csp_source();
    let script_uri = webview.as_webview_uri(&media.join(MAIN_SCRIPT));
    let styles_reset_uri = webview.as_webview_uri(&media.join(RESET_CSS));
    let styles_main_uri = webview.as_webview_uri(&media.join(PETS_CSS));
    let base_pet_uri = webview.as_webview_uri(&media);

    let params = ContentParams {
        csp_source: &csp_source,
        script_uri: &script_uri,
        styles_reset_uri: &styles_reset_uri,
        styles_main_uri: &styles_main_uri,
        base_pet_uri: &base_pet_uri,
        theme: state.theme,
        theme_kind: state.theme_kind,
        color: state.pet_color(),
        size: state.size,
        pet_type: state.pet_type,
    };
    render_html(&params, &generate_nonce())
}
