/// Terminal front end: feeds crossterm input to a [`Viewer`] and presents its
/// frames as half-block colour cells
use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};
use swgl_core::{FrameStats, Projection, RendererConfig, Scene, Viewer};
use tracing::{debug, info};

pub mod presenter;
pub mod scenes;

pub use presenter::TerminalPresenter;

/// Terminal rows above the picture kept for the status line
pub const STATUS_ROWS: u16 = 1;

/// Main application struct for terminal rendering
pub struct TerminalApp<S: Scene> {
    viewer: Viewer<S>,
    /// Configured projection before fitting to the terminal's aspect ratio
    projection: Projection,
    presenter: TerminalPresenter,
    running: bool,
    target_frame_time: Duration,
    last_sample: Instant,
    frame_count: u32,
    fps: f32,
    stats: FrameStats,
}

impl<S: Scene> TerminalApp<S> {
    /// `config.projection` is widened to the aspect ratio of `config.width`
    /// by `config.height`, and again on every terminal resize
    pub fn new(config: &RendererConfig, scene: S, fps: u32) -> Result<Self> {
        let fitted = RendererConfig {
            projection: fit_projection(&config.projection, config.width, config.height),
            ..config.clone()
        };
        let viewer = Viewer::new(&fitted, scene).context("creating viewer")?;
        Ok(Self {
            viewer,
            projection: config.projection,
            presenter: TerminalPresenter::with_top(STATUS_ROWS),
            running: true,
            target_frame_time: Duration::from_secs(1) / fps.max(1),
            last_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            stats: FrameStats::default(),
        })
    }

    pub fn viewer(&self) -> &Viewer<S> {
        &self.viewer
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("enabling raw mode")?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            Clear(ClearType::All)
        )?;
        info!(scene = self.viewer.scene().name(), "terminal app started");

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        info!(frames = self.viewer.frames(), "terminal app stopped");

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        let mut last_tick = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::ZERO)? {
                let event = event::read()?;
                self.handle_event(event)?;
            }
            if !self.running {
                break;
            }

            let dt = frame_start.duration_since(last_tick).as_secs_f32();
            last_tick = frame_start;
            self.stats = self.viewer.on_frame_tick(dt)?;

            let mut out = stdout();
            self.present(&mut out)?;
            out.flush()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_sample = now;
            }
        }

        Ok(())
    }

    /// Apply one terminal event to the viewer
    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Char('r') => {
                    self.viewer.arcball_mut().reset();
                }
                KeyCode::Char(c) => self.viewer.on_key(c),
                _ => {}
            },
            Event::Mouse(MouseEvent {
                kind,
                column,
                row,
                ..
            }) => {
                let (x, y) = cell_to_pixel(column, row);
                match kind {
                    MouseEventKind::Down(MouseButton::Left) => self.viewer.on_pointer_down(x, y),
                    MouseEventKind::Drag(MouseButton::Left) => self.viewer.on_pointer_move(x, y),
                    MouseEventKind::Up(MouseButton::Left) => self.viewer.on_pointer_up(x, y),
                    _ => {}
                }
            }
            Event::Resize(columns, rows) => {
                let (width, height) = frame_size(columns, rows);
                let projection = fit_projection(&self.projection, width, height);
                self.viewer
                    .resize(width, height, &projection)
                    .context("resizing viewer")?;
                debug!(columns, rows, width, height, "terminal resized");
            }
            _ => {}
        }
        Ok(())
    }

    fn present<W: Write>(&self, out: &mut W) -> Result<()> {
        self.presenter.draw(out, &self.viewer.frame_buffer())?;

        // Draw UI overlay
        queue!(
            out,
            cursor::MoveTo(0, 0),
            Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "{} | FPS: {:.1} | drawn {} culled {} | Drag=Rotate R=Reset Q=Quit",
                self.viewer.scene().name(),
                self.fps,
                self.stats.drawn,
                self.stats.culled,
            )),
            ResetColor
        )?;
        Ok(())
    }
}

/// Pixel under the upper half of a terminal cell
pub fn cell_to_pixel(column: u16, row: u16) -> (i32, i32) {
    (column as i32, (row as i32 - STATUS_ROWS as i32) * 2)
}

/// Frame buffer size for a terminal of `columns × rows` cells
pub fn frame_size(columns: u16, rows: u16) -> (u32, u32) {
    let picture_rows = rows.saturating_sub(STATUS_ROWS).max(1);
    (u32::from(columns.max(2)), u32::from(picture_rows) * 2)
}

/// Widen `projection` horizontally so square scene units stay square on a
/// `width × height` viewport
pub fn fit_projection(projection: &Projection, width: u32, height: u32) -> Projection {
    let aspect = width as f32 / height.max(1) as f32;
    match *projection {
        Projection::Orthographic {
            left,
            right,
            bottom,
            top,
            near,
            far,
        } => Projection::Orthographic {
            left: left * aspect,
            right: right * aspect,
            bottom,
            top,
            near,
            far,
        },
        Projection::Frustum {
            left,
            right,
            bottom,
            top,
            near,
            far,
        } => Projection::Frustum {
            left: left * aspect,
            right: right * aspect,
            bottom,
            top,
            near,
            far,
        },
        Projection::Perspective {
            fovy, near, far, ..
        } => Projection::Perspective {
            fovy,
            aspect,
            near,
            far,
        },
    }
}
