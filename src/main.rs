use tree_diagram::cli::Args;
use tree_diagram::config;
use tree_diagram::core::event_bus::{EventBus, downcast_event};
use tree_diagram::entities::TreeNode;
use tree_diagram::settings::AppSettings;
use tree_diagram::widgets::tree::{DiagramLayout, layout_tree};
use tree_diagram::widgets::viewport::{
    self, ResetViewportEvent, ToggleHelpEvent, TreeViewport, ZoomInEvent, ZoomOutEvent,
};

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use log::{debug, info};

/// Main application state
struct TreeDiagramApp {
    layout: DiagramLayout,
    viewport: TreeViewport,
    settings: AppSettings,
    event_bus: EventBus,
}

impl TreeDiagramApp {
    fn new(layout: DiagramLayout, settings: AppSettings) -> Self {
        let event_bus = EventBus::new();
        event_bus.subscribe::<ResetViewportEvent, _>(|_| info!("Viewport reset requested"));

        Self {
            layout,
            viewport: TreeViewport::new(),
            settings,
            event_bus,
        }
    }

    /// Keyboard shortcuts, routed through the bus like the overlay buttons
    fn handle_hotkeys(&self, ctx: &egui::Context) {
        ctx.input(|i| {
            if i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals) {
                self.event_bus.emit(ZoomInEvent);
            }
            if i.key_pressed(egui::Key::Minus) {
                self.event_bus.emit(ZoomOutEvent);
            }
            if i.key_pressed(egui::Key::Num0) {
                self.event_bus.emit(ResetViewportEvent);
            }
            if i.key_pressed(egui::Key::F1) {
                self.event_bus.emit(ToggleHelpEvent);
            }
        });
    }

    /// Drain queued events. Returns true if anything was handled.
    fn process_events(&mut self) -> bool {
        let mut handled = false;
        for event in self.event_bus.poll() {
            if self.viewport.apply_event(&event) {
                handled = true;
            } else if downcast_event::<ToggleHelpEvent>(&event).is_some() {
                self.settings.show_help = !self.settings.show_help;
                debug!("Help overlay: {}", self.settings.show_help);
                handled = true;
            } else {
                debug!("Unhandled event: {}", (*event).type_name());
            }
        }
        handled
    }
}

impl eframe::App for TreeDiagramApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_hotkeys(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let actions = viewport::render(ui, &mut self.viewport, &self.layout, &self.settings);
                for evt in actions.events {
                    self.event_bus.emit_boxed(evt);
                }
            });

        if self.process_events() {
            ctx.request_repaint();
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Some(json) = self.settings.to_json() {
            storage.set_string(eframe::APP_KEY, json);
            debug!("Settings saved: {:?}", self.settings);
        }
    }
}

fn init_logging(args: &Args, path_config: &config::PathConfig) -> Result<()> {
    let log_level = args.log_level();

    if let Some(log_path_opt) = &args.log_file {
        let log_path = log_path_opt
            .clone()
            .unwrap_or_else(|| config::data_file(config::LOG_FILE, path_config));
        let file = std::fs::File::create(&log_path)
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

        env_logger::Builder::new()
            .filter_level(log_level)
            .filter_module("egui", log::LevelFilter::Info) // Suppress egui DEBUG spam
            .filter_module("eframe", log::LevelFilter::Info)
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();

        info!("Logging to file: {} (level: {:?})", log_path.display(), log_level);
    } else {
        // Console logging (respects RUST_LOG if set)
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(log_level.as_str().to_lowercase()),
        )
        .filter_module("egui", log::LevelFilter::Info)
        .filter_module("eframe", log::LevelFilter::Info)
        .format_timestamp_millis()
        .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let path_config = config::PathConfig::from_env_and_cli(args.config_dir.clone());
    if let Err(e) = config::ensure_dirs(&path_config) {
        eprintln!("Warning: Failed to create application directories: {:#}", e);
    }

    init_logging(&args, &path_config)?;
    info!("Tree diagram starting...");
    debug!("Command-line args: {:?}", args);

    let settings_path = config::config_file(config::SETTINGS_FILE, &path_config);
    info!("Settings path: {}", settings_path.display());

    let tree = match &args.tree_file {
        Some(path) => TreeNode::from_json(path)?,
        None => {
            info!("No tree file given, using built-in family tree");
            TreeNode::family_tree()
        }
    };
    let layout = layout_tree(&tree).context("Failed to lay out tree")?;
    info!(
        "Tree '{}': {} nodes, depth {}, diagram {:.0}x{:.0}",
        tree.id,
        tree.len(),
        tree.depth(),
        layout.size.x,
        layout.size.y
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "Tree Diagram v{} • {} • F1 for help",
                env!("CARGO_PKG_VERSION"),
                if tree.label.is_empty() { &tree.id } else { &tree.label }
            ))
            .with_inner_size([1280.0, 800.0])
            .with_resizable(true),
        persist_window: true,
        persistence_path: Some(settings_path),
        ..Default::default()
    };

    eframe::run_native(
        "tree-diagram",
        native_options,
        Box::new(move |cc| {
            // The viewport owns ctrl+wheel and +/-; egui must not rescale the whole UI
            cc.egui_ctx.options_mut(|o| o.zoom_with_keyboard = false);

            let settings = cc
                .storage
                .and_then(|storage| storage.get_string(eframe::APP_KEY))
                .and_then(|json| AppSettings::from_json(&json))
                .unwrap_or_else(|| {
                    info!("No persisted settings found, using defaults");
                    AppSettings::default()
                });
            debug!("Settings: {:?}", settings);

            Ok(Box::new(TreeDiagramApp::new(layout, settings)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Window error: {e}"))?;

    info!("Application exiting");
    Ok(())
}
