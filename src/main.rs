pub mod graphics;
pub mod interface;

use std::ffi::CStr;
use std::process::exit;
use std::time::Instant;

use clap::Parser;
use glutin::dpi::LogicalSize;
use glutin::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use glutin::event_loop::{ControlFlow, EventLoop};
use glutin::window::WindowBuilder;
use glutin::{Api, ContextBuilder, GlRequest};
use log::{error, info};

use crate::graphics::scene::CubeScene;
use crate::graphics::GlError;
use crate::interface::cli::Options;

/// Opens the window, builds the scene and hands control to the event
/// loop. Only returns on failures that happen before the loop starts;
/// after that glutin owns the thread until the window closes.
fn run(options: Options) -> Result<(), GlError> {
    let events = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("escubes")
        .with_inner_size(LogicalSize::new(options.width as f64, options.height as f64));
    let context = ContextBuilder::new()
        .with_gl(GlRequest::Specific(Api::OpenGlEs, (3, 0)))
        .with_depth_buffer(24)
        .with_vsync(true)
        .build_windowed(window, &events)
        .map_err(|e| GlError::Window(e.to_string()))?;

    let context = unsafe {
        context
            .make_current()
            .map_err(|(_, e)| GlError::Window(e.to_string()))?
    };

    gl::load_with(|s| context.get_proc_address(s) as *const std::ffi::c_void);

    unsafe {
        let version = gl::GetString(gl::VERSION);
        if !version.is_null() {
            info!(
                "context: {}",
                CStr::from_ptr(version as *const _).to_string_lossy()
            );
        }
    }

    let mut scene = CubeScene::new(
        options.strategy,
        options.shape,
        options.instances as usize,
        options.scale,
    )?;
    let mut last_frame = Instant::now();

    events.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            virtual_keycode: Some(VirtualKeyCode::Escape),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => *control_flow = ControlFlow::Exit,
                WindowEvent::Resized(size) => context.resize(size),
                _ => {}
            },
            Event::MainEventsCleared => context.window().request_redraw(),
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let delta = now.duration_since(last_frame).as_secs_f32();
                last_frame = now;

                let size = context.window().inner_size();
                let aspect = size.width as f32 / size.height.max(1) as f32;

                // Map/unmap failures are the only errors a frame can hit
                // once init succeeded; the strategies keep their staged
                // data, so logging and showing the previous frame again
                // lets the next one retry.
                let frame = scene
                    .update(delta, aspect)
                    .and_then(|_| scene.draw(size.width as i32, size.height as i32));
                if let Err(e) = frame {
                    error!("dropping this frame: {}", e);
                    return;
                }

                if let Err(e) = context.swap_buffers() {
                    error!("swapping buffers failed: {}", e);
                    exit(1);
                }
            }
            _ => {}
        }
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = Options::parse();

    if let Err(e) = run(options) {
        error!("{}", e);
        exit(1);
    }
}
