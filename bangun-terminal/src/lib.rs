//! Terminal front end: keyboard menu plus ASCII rendering of the scene
use bangun_core::{
    parse_tag, Camera, Category, GeometryPool, MenuController, MenuOutcome, SceneController,
    ShapeError, ViewerConfig,
};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Rows reserved above the viewport for the menu and status lines.
const OVERLAY_ROWS: u16 = 2;

/// Rotation applied per key press (radians).
const NUDGE: f32 = 0.1;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;

/// Everything a key press can ask the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Quit,
    Select(Category),
    SideCount(u32),
    ToggleNet,
    Rotate(f32, f32, f32),
}

impl Command {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        let command = match code {
            KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
            KeyCode::Char('k') => Command::Select(Category::Kubus),
            KeyCode::Char('b') => Command::Select(Category::Balok),
            KeyCode::Char('t') => Command::Select(Category::Tabung),
            KeyCode::Char('c') => Command::Select(Category::Kerucut),
            KeyCode::Char('p') => Command::Select(Category::Prisma),
            KeyCode::Char('l') => Command::Select(Category::Limas),
            KeyCode::Char(digit @ '3'..='6') => Command::SideCount(digit as u32 - '0' as u32),
            KeyCode::Char('n') => Command::ToggleNet,
            KeyCode::Char('w') | KeyCode::Up => Command::Rotate(NUDGE, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => Command::Rotate(-NUDGE, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => Command::Rotate(0.0, -NUDGE, 0.0),
            KeyCode::Char('d') | KeyCode::Right => Command::Rotate(0.0, NUDGE, 0.0),
            KeyCode::Char('e') => Command::Rotate(0.0, 0.0, NUDGE),
            KeyCode::Char('r') => Command::Rotate(0.0, 0.0, -NUDGE),
            _ => return None,
        };
        Some(command)
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: SceneController,
    menu: MenuController,
    config: ViewerConfig,
    camera: Camera,
    renderer: AsciiRenderer,
    status: String,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(config, width, height))
    }

    /// Build the app for a terminal of `width` x `height` cells.
    pub fn with_size(config: ViewerConfig, width: u16, height: u16) -> Self {
        let (view_width, view_height) = viewport(width, height);
        let camera = Camera::from_config(&config.camera, aspect(view_width, view_height));
        let renderer = AsciiRenderer::new(view_width, view_height, config.light_vector(), config.ambient);

        Self {
            scene: SceneController::new(GeometryPool::new(), &config),
            menu: MenuController::new(),
            config,
            camera,
            renderer,
            status: String::from("Pilih bangun ruang"),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn scene(&self) -> &SceneController {
        &self.scene
    }

    pub fn menu(&self) -> &MenuController {
        &self.menu
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Load a shape tag before the loop starts, opening its submenu for
    /// prisms and pyramids.
    pub fn preload(&mut self, tag: &str) -> Result<(), ShapeError> {
        let category = Category::of(parse_tag(tag)?);
        if let MenuOutcome::ShowVariants(_) = self.menu.select_shape(category.label(), &mut self.scene)? {
            self.menu.select_variant(tag, &mut self.scene)?;
        }
        self.refresh_status();
        Ok(())
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / u64::from(self.config.target_fps.max(1)));

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Update
            self.update();

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                if let Some(command) = Command::from_key(code) {
                    self.apply(command);
                }
            }
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
    }

    pub fn apply(&mut self, command: Command) {
        let result = match command {
            Command::Quit => {
                self.running = false;
                Ok(())
            }
            Command::Select(category) => self.menu.select_shape(category.label(), &mut self.scene).map(drop),
            Command::SideCount(sides) => self.menu.select_side_count(sides, &mut self.scene).map(drop),
            Command::ToggleNet => {
                self.scene.toggle_net();
                Ok(())
            }
            Command::Rotate(dx, dy, dz) => {
                self.scene.nudge(dx, dy, dz);
                Ok(())
            }
        };

        match result {
            Ok(()) => self.refresh_status(),
            Err(err) => self.status = err.to_string(),
        }
    }

    fn refresh_status(&mut self) {
        self.status = match (self.menu.submenu(), self.scene.group()) {
            (Some(submenu), None) => {
                let choices: Vec<String> = submenu
                    .entries
                    .iter()
                    .map(|entry| {
                        let sides = entry.shape.composite().map(|(_, s)| s.get()).unwrap_or_default();
                        format!("[{sides}] {}", entry.label)
                    })
                    .collect();
                format!("{} {}", submenu.title(), choices.join("  "))
            }
            (_, Some(group)) if group.shape().supports_net() => {
                let layout = if self.scene.net_layout().is_open() { "terbuka" } else { "tertutup" };
                format!("{} | [n] jaring-jaring: {layout}", group.shape())
            }
            (_, Some(group)) => group.shape().to_string(),
            (None, None) => String::from("Pilih bangun ruang"),
        };
    }

    fn resize(&mut self, width: u16, height: u16) {
        let (view_width, view_height) = viewport(width, height);
        self.renderer.resize(view_width, view_height);
        self.camera.set_aspect(aspect(view_width, view_height));
    }

    fn update(&mut self) {
        self.scene.tick();

        // No GPU buffers to free here; keep the release queue from growing.
        for id in self.scene.pool().drain_released() {
            tracing::trace!(%id, "released geometry acknowledged");
        }
    }

    fn render(&mut self) -> io::Result<()> {
        // Clear renderer
        self.renderer.clear();

        // Render the displayed shape
        if let Some(group) = self.scene.group() {
            self.renderer.render_group(group, &self.camera);
        }

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, OVERLAY_ROWS))?;

        self.renderer.draw(&mut stdout, self.config.color_rgb())?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Bangun | FPS: {:.1} | [k]ubus [b]alok [t]abung kerucut[c] [p]risma [l]imas | WASD/Arrows=Rotate Q=Quit",
                self.fps
            )),
            cursor::MoveTo(0, 1),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Cyan),
            Print(&self.status),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

fn viewport(width: u16, height: u16) -> (usize, usize) {
    (usize::from(width), usize::from(height.saturating_sub(OVERLAY_ROWS)))
}

fn aspect(width: usize, height: usize) -> f32 {
    width as f32 / (height.max(1) as f32 * CELL_ASPECT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bangun_core::{NetLayout, ShapeId, SideCount};

    fn app() -> TerminalApp {
        TerminalApp::with_size(ViewerConfig::default(), 80, 42)
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(Command::from_key(KeyCode::Char('q')), Some(Command::Quit));
        assert_eq!(Command::from_key(KeyCode::Esc), Some(Command::Quit));
        assert_eq!(
            Command::from_key(KeyCode::Char('l')),
            Some(Command::Select(Category::Limas))
        );
        assert_eq!(Command::from_key(KeyCode::Char('5')), Some(Command::SideCount(5)));
        assert_eq!(Command::from_key(KeyCode::Char('7')), None);
        assert_eq!(Command::from_key(KeyCode::Char('n')), Some(Command::ToggleNet));
    }

    #[test]
    fn test_viewport_leaves_room_for_overlay() {
        let app = app();
        assert_eq!(app.renderer.width(), 80);
        assert_eq!(app.renderer.height(), 40);
    }

    #[test]
    fn test_menu_flow_through_commands() {
        let mut app = app();
        app.apply(Command::Select(Category::Prisma));
        assert!(app.scene().group().is_none());
        assert!(app.status().starts_with("Pilih prisma:"));

        app.apply(Command::SideCount(5));
        assert_eq!(
            app.scene().group().map(|g| g.shape()),
            Some(ShapeId::Prism(SideCount::PENTAGON))
        );
        assert_eq!(app.status(), "prisma-segilima");
    }

    #[test]
    fn test_net_toggle_status() {
        let mut app = app();
        app.apply(Command::Select(Category::Kubus));
        app.apply(Command::ToggleNet);
        assert_eq!(app.scene().net_layout(), NetLayout::Open);
        assert!(app.status().ends_with("terbuka"));
    }

    #[test]
    fn test_preload_opens_submenu_for_variants() {
        let mut app = app();
        app.preload("limas-segienam").unwrap();
        assert!(app.menu().submenu().is_some());
        assert_eq!(
            app.scene().group().map(|g| g.shape()),
            Some(ShapeId::Pyramid(SideCount::HEXAGON))
        );
        assert!(app.preload("bola").is_err());
    }

    #[test]
    fn test_quit_stops_loop() {
        let mut app = app();
        app.apply(Command::Quit);
        assert!(!app.is_running());
    }
}
