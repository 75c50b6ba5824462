//! Shader widget hosting the cube scene.
//!
//! Follows the pattern of keeping all scene state inside the widget: the
//! program owns a `CubeApp` plus the CPU vertex mirror, feeds input events
//! into it, drives animation from redraw timestamps, and hands the
//! renderer a plain snapshot to draw each frame.

use std::time::{Duration, Instant};

use iced::widget::shader::{self, wgpu};
use iced::{Rectangle, event, mouse, window};

use crate::Message;
use crate::app::{CubeApp, Highlight};
use crate::camera::{self, ViewUniform};
use crate::cube::VERTEX_COUNT;
use crate::picking;
use crate::renderer::{Renderer, VertexMirror};

/// Gap between redraws treated as a display stall (minimized window)
/// rather than one slow frame.
const STALL_GAP: Duration = Duration::from_millis(500);

/// Snapshot handed to the render thread each frame.
#[derive(Debug, Clone)]
pub(crate) struct CubePrimitive {
    vertices: [[f32; 3]; VERTEX_COUNT],
    highlight: Highlight,
    display_tilt: bool,
}

impl shader::Primitive for CubePrimitive {
    fn prepare(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        storage: &mut shader::Storage,
        bounds: &Rectangle,
        viewport: &shader::Viewport,
    ) {
        if !storage.has::<Renderer>() {
            let renderer = pollster::block_on(Renderer::new(
                device,
                format,
                *bounds,
                viewport.physical_size(),
                &self.vertices,
            ));
            storage.store(renderer);
        }
        let renderer = storage.get_mut::<Renderer>().unwrap();
        renderer.resize(device, *bounds, viewport.physical_size());
        renderer.upload_vertices(queue, &VertexMirror(self.vertices));
        let aspect = if bounds.height > 0.0 {
            bounds.width / bounds.height
        } else {
            1.0
        };
        renderer.update_view(queue, &ViewUniform::new(aspect, self.display_tilt));
        renderer.update_highlight(queue, self.highlight);
    }

    fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        storage: &shader::Storage,
        target: &wgpu::TextureView,
        _clip_bounds: &Rectangle<u32>,
    ) {
        let renderer = storage.get::<Renderer>().unwrap();
        renderer.render(encoder, target);
    }
}

/// Internal state managed by the shader widget.
pub(crate) struct CubeShaderState {
    app: CubeApp,
    mirror: VertexMirror,
    last_redraw: Option<Instant>,
}

impl Default for CubeShaderState {
    fn default() -> Self {
        let mut app = CubeApp::new();
        app.queue_opening_moves();
        let mirror = VertexMirror::new(app.vertices());
        Self {
            app,
            mirror,
            last_redraw: None,
        }
    }
}

/// The shader program driving the cube scene.
pub(crate) struct CubeShaderProgram;

impl shader::Program<Message> for CubeShaderProgram {
    type State = CubeShaderState;
    type Primitive = CubePrimitive;

    fn update(
        &self,
        state: &mut Self::State,
        event: shader::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
        shell: &mut iced::advanced::Shell<'_, Message>,
    ) -> (event::Status, Option<Message>) {
        match event {
            shader::Event::RedrawRequested(now) => {
                if let Some(last) = state.last_redraw {
                    let gap = now.saturating_duration_since(last);
                    if gap > STALL_GAP {
                        state.app.exclude_stall(gap);
                    }
                }
                state.last_redraw = Some(now);
                state.app.tick(now, &mut state.mirror);
                shell.request_redraw(window::RedrawRequest::NextFrame);
                (event::Status::Captured, None)
            }
            shader::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let Some(position) = cursor.position_in(bounds) else {
                    return (event::Status::Ignored, None);
                };
                if state.app.ready_to_pick() {
                    if let Some(face) = picking::face_at(
                        state.app.vertices(),
                        position.x,
                        position.y,
                        bounds.width,
                        bounds.height,
                        camera::world_scale(),
                    ) {
                        state.app.select_face(face);
                    }
                }
                (event::Status::Captured, None)
            }
            shader::Event::Keyboard(keyboard_event) => (handle_key(state, keyboard_event), None),
            _ => (event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        state: &Self::State,
        _cursor: mouse::Cursor,
        _bounds: Rectangle,
    ) -> Self::Primitive {
        CubePrimitive {
            vertices: state.mirror.0,
            highlight: state.app.highlight(),
            display_tilt: state.app.rotating(),
        }
    }
}

/// Key releases drive the fold, recenter, and pause actions.
fn handle_key(state: &mut CubeShaderState, event: iced::keyboard::Event) -> event::Status {
    use iced::keyboard::{Event, Key, key};

    let Event::KeyReleased { key, .. } = event else {
        return event::Status::Ignored;
    };

    match key.as_ref() {
        Key::Named(key::Named::Space) => {
            state.app.toggle_fold(&mut state.mirror);
            event::Status::Captured
        }
        Key::Character("r") => {
            state.app.recenter_in_view(&mut state.mirror);
            event::Status::Captured
        }
        Key::Character("s") => {
            state.app.toggle_pause(Instant::now());
            event::Status::Captured
        }
        _ => event::Status::Ignored,
    }
}
