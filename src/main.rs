mod cli;
mod presenter;

use winit::{
    event::{
        ElementState,
        Event,
        MouseButton,
        WindowEvent,
    },
    event_loop::ControlFlow,
};
use bui::renderer;
use clap::Parser;
use glam::Vec2;
use rand::{rngs::StdRng, SeedableRng};
use std::{
    thread,
    time::{
        Duration,
        Instant,
    },
};

use word_storm::{
    Canvas,
    Config,
    Effect,
    Error,
    LightningEffect,
    ParticleTextEffect,
    PointerButton,
    PointerEvent,
    Result,
};

use crate::cli::{Cli, Commands};
use crate::presenter::FramePresenter;

type CanvasRef<'a> = &'a mut Canvas;
type PresenterRef<'a> = &'a mut FramePresenter;
type EffectRef<'a> = &'a mut dyn Effect;
type RendererRef<'a> = &'a renderer::Renderer;
constrainer::create_constrainer!(Viewport {
    dynamic width u32
    dynamic height u32
    external canvas CanvasRef
    external presenter PresenterRef
    external effect EffectRef
    external renderer RendererRef

    listener resize_frame (width, height, canvas, presenter, effect, renderer) {
        // Zero-sized textures are invalid; minimized windows report 0x0.
        let (width, height) = (width.max(1), height.max(1));
        canvas.resize(width, height);
        presenter.resize(renderer.device(), width, height);
        effect.resize(width, height);
    }

    opgenset (width, height)
});

fn main() {
    let cli = Cli::parse();

    // RUST_LOG, when set, overrides the verbosity flags.
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match &cli.command {
        Commands::Particles { words, circles, stride } => {
            config.apply_particle_overrides(words, *circles, *stride)?;
        }
        Commands::Lightning { probability } => {
            config.apply_lightning_overrides(*probability)?;
        }
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let event_loop = winit::event_loop::EventLoop::new();
    let window = winit::window::WindowBuilder::new()
        .with_title("Word Storm")
        .build(&event_loop)
        .map_err(|e| Error::CanvasUnavailable(e.to_string()))?;
    let mut renderer = futures::executor::block_on(renderer::Renderer::new(&window));

    let size = window.inner_size();
    let (width, height) = (size.width.max(1), size.height.max(1));
    let mut canvas = Canvas::new(width, height);
    let mut presenter = FramePresenter::new(renderer.device(), renderer.config().format, width, height);
    let mut effect: Box<dyn Effect> = match cli.command {
        Commands::Particles { .. } => Box::new(ParticleTextEffect::new(config.particles, width, height, rng)?),
        Commands::Lightning { .. } => Box::new(LightningEffect::new(config.lightning, rng)?),
    };
    log::info!("running {} effect at {}x{}", effect.name(), width, height);

    let mut viewport = Viewport::new(width, height, &mut canvas, &mut presenter, effect.as_mut(), &renderer);

    let frame_budget = Duration::from_secs_f32(1.0/config.frame_rate as f32);
    let mut last_frame_time = Instant::now();
    let mut cursor = Vec2::ZERO;
    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                *control_flow = ControlFlow::Exit
            },
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => {
                match event {
                    WindowEvent::Resized(physical_size) => {
                        renderer.resize(*physical_size);
                        viewport.set_width_height(
                            physical_size.width,
                            physical_size.height,
                            &mut canvas,
                            &mut presenter,
                            effect.as_mut(),
                            &renderer,
                        )
                    },
                    WindowEvent::ScaleFactorChanged {
                        new_inner_size,
                        ..
                    } => {
                        renderer.resize(**new_inner_size);
                        viewport.set_width_height(
                            new_inner_size.width,
                            new_inner_size.height,
                            &mut canvas,
                            &mut presenter,
                            effect.as_mut(),
                            &renderer,
                        )
                    },
                    WindowEvent::CursorMoved {
                        position,
                        ..
                    } => {
                        cursor = Vec2::new(position.x as f32, position.y as f32);
                        effect.pointer(PointerEvent::Moved { at: cursor });
                    },
                    WindowEvent::MouseInput {
                        state,
                        button,
                        ..
                    } => {
                        let event = match state {
                            ElementState::Pressed => PointerEvent::Pressed {
                                button: pointer_button(*button),
                                at: cursor,
                            },
                            ElementState::Released => PointerEvent::Released,
                        };
                        effect.pointer(event);
                    },
                    _ => {}
                }
            },
            Event::RedrawRequested(_) => {
                effect.frame(&mut canvas);
                presenter.upload(renderer.queue(), &canvas);
                match renderer.surface().get_current_texture() {
                    Ok(surface_texture) => {
                        let view = surface_texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
                        let mut encoder = renderer.device().create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Render encoder"),
                        });
                        presenter.render(&mut encoder, &view);
                        renderer.queue().submit(std::iter::once(encoder.finish()));
                        surface_texture.present();
                    },
                    Err(wgpu::SurfaceError::Lost) => {
                        log::warn!("surface lost, reconfiguring");
                        renderer.reconfigure();
                    },
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("out of memory, exiting");
                        *control_flow = ControlFlow::Exit;
                    },
                    Err(e) => {
                        log::warn!("surface error: {:?}", e);
                    },
                };
                thread::sleep(frame_budget.saturating_sub(last_frame_time.elapsed()));
                last_frame_time = Instant::now();
                window.request_redraw();
            },
            _ => ()
        }
    });
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        _ => PointerButton::Other,
    }
}
