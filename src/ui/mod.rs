mod render;
mod state;

pub use render::{render, AudioToggleAttrs, ControlAttrs, ControlSurface, PointerEvents, PreviewAttrs};
pub use state::{AudioToggle, UiState};
