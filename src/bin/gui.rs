use eframe::egui;
use ogbt_flow::{FlowConfig, FlowEditorApp};

fn main() -> eframe::Result<()> {
    ogbt_flow::init_tracing("info");

    let config = FlowConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %format!("{:#}", e), "falling back to default config");
        FlowConfig::default()
    });
    let config_path = FlowConfig::config_file_path();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_title("OGBT Application"),
        ..Default::default()
    };

    eframe::run_native(
        "OGBT Application",
        options,
        Box::new(|_cc| Ok(Box::new(FlowEditorApp::new(config, config_path)))),
    )
}
