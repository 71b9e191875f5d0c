use crate::app::{Prompt, ReviewApp};

pub fn show(ctx: &egui::Context, app: &mut ReviewApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        // Progress bar while loading and detecting
        match app.session.progress {
            Some((stage, done, total)) => {
                let (fraction, detail) = match total {
                    Some(total) if total > 0 => {
                        (done as f32 / total as f32, format!("{stage} ({done}/{total})"))
                    }
                    _ => (0.0, format!("{stage}...")),
                };
                ui.add(egui::ProgressBar::new(fraction).text(detail).animate(true));
            }
            None => {
                ui.add(egui::ProgressBar::new(0.0).text(""));
            }
        }

        ui.horizontal(|ui| match app.session.prompt {
            Prompt::Loading => {
                ui.label("Loading series...");
            }
            Prompt::Tracking => {
                ui.label("Tracking");
                ui.separator();
                ui.weak("P: pause   Q: cancel all remaining spots");
            }
            Prompt::Paused => {
                ui.colored_label(egui::Color32::YELLOW, "Paused");
                ui.separator();
                ui.weak("Press Q to stop, any other key to resume");
            }
            Prompt::Decision(ref text) => {
                ui.strong(text);
                ui.separator();
                ui.colored_label(egui::Color32::LIGHT_GREEN, "Y: save measurement");
                ui.colored_label(egui::Color32::LIGHT_RED, "N: discard");
            }
            Prompt::Done => {
                ui.label("Finished");
            }
        });

        // Log area, fixed height for 4 lines.
        let line_height = ui.text_style_height(&egui::TextStyle::Body);
        let spacing = ui.spacing().item_spacing.y;
        let log_height = line_height * 4.0 + spacing * 3.0;

        egui::ScrollArea::vertical()
            .max_height(log_height)
            .min_scrolled_height(log_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for msg in &app.session.log_messages {
                    ui.label(msg);
                }
            });

        ui.horizontal(|ui| {
            if let Some(ref size) = app.viewport.image_size {
                ui.label(format!("{}x{}", size[0], size[1]));
                ui.separator();
            }
            ui.label(format!("Zoom: {:.0}%", app.viewport.zoom * 100.0));
        });

        ui.add_space(2.0);
    });
}
