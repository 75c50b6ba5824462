//! Interactive folding-cube visualizer with iced UI.
//!
//! A six-face puzzle cube that folds between a flat cross-shaped net and a
//! 3D cube, with mouse-driven face rolling on the flat net. Uses iced for
//! the UI shell and wgpu for GPU rendering.

use iced::widget::{Column, Row, Shader, text};
use iced::{Element, Length, Settings, Task};

mod adjacency;
mod animation;
mod app;
mod camera;
mod cube;
mod math;
mod picking;
mod renderer;
mod shader_widget;

use shader_widget::CubeShaderProgram;

/// UI messages; the cube scene drives itself inside the shader widget, so
/// the shell has none to deliver.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Message {}

/// Main application state - the control pane is static help text.
struct CubefoldApp;

impl CubefoldApp {
    /// Update the application state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {}
    }

    /// Create the view for the application
    fn view(&self) -> Element<'_, Message> {
        // Left pane with the key bindings
        let help = Column::new()
            .spacing(10)
            .push(text("Space: fold or unfold the cube"))
            .push(text("R: recenter the flat net"))
            .push(text("S: pause or resume animations"))
            .push(text("Click two squares to roll the first beside the second"));

        // Right pane with the scene viewport
        let viewport = Shader::new(CubeShaderProgram)
            .width(Length::Fill)
            .height(Length::Fill);

        Row::new()
            .spacing(10)
            .padding(10)
            .push(
                iced::widget::container(help)
                    .width(Length::Shrink)
                    .height(Length::Fill),
            )
            .push(viewport)
            .into()
    }
}

/// Entry point for the folding-cube application
fn main() -> iced::Result {
    env_logger::builder().format_timestamp(None).init();

    log::info!("press Space to fold or unfold the cube");
    log::info!("press S to pause or resume animations");
    log::info!("press R to recenter the flat net");
    log::info!(
        "while flat, left-click two squares: the first rolls around the net \
         until it lands beside the second, or an error is reported if it cannot"
    );

    iced::application("Folding Cube", CubefoldApp::update, CubefoldApp::view)
        .settings(Settings {
            antialiasing: true,
            ..Settings::default()
        })
        .run_with(|| (CubefoldApp, Task::none()))
}
