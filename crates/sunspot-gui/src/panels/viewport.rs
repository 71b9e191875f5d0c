use crate::app::ReviewApp;

const MIN_ZOOM: f32 = 0.25;
const MAX_ZOOM: f32 = 20.0;

pub fn show(ctx: &egui::Context, app: &mut ReviewApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let rect = ui.available_rect_before_wrap();
        ui.painter()
            .rect_filled(rect, 0.0, egui::Color32::from_gray(30));

        let texture_info = app
            .viewport
            .texture
            .as_ref()
            .map(|t| (t.id(), egui::vec2(t.size()[0] as f32, t.size()[1] as f32)));

        let Some((texture_id, tex_size)) = texture_info else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new("Waiting for the first tracked frame")
                        .size(18.0)
                        .color(egui::Color32::from_gray(100)),
                );
            });
            return;
        };

        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        handle_zoom(ui, &response, app, rect);
        if response.dragged() {
            app.viewport.pan_offset += response.drag_delta();
        }
        if response.double_clicked() {
            app.viewport.zoom = 1.0;
            app.viewport.pan_offset = egui::Vec2::ZERO;
        }

        // Zoom 1.0 fits the frame to the panel.
        let fit = (rect.width() / tex_size.x).min(rect.height() / tex_size.y);
        let img_rect = egui::Rect::from_center_size(
            rect.center() + app.viewport.pan_offset,
            tex_size * fit * app.viewport.zoom,
        );
        ui.painter().image(
            texture_id,
            img_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        draw_viewing_label(ui, rect, &app.viewport.viewing_label, app.viewport.failed);
    });
}

fn handle_zoom(ui: &egui::Ui, response: &egui::Response, app: &mut ReviewApp, rect: egui::Rect) {
    let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
    if scroll_delta == 0.0 || !response.hovered() {
        return;
    }

    let zoom_factor = (scroll_delta * 0.005).exp();
    let new_zoom = (app.viewport.zoom * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);

    // Zoom toward mouse cursor
    if let Some(mouse_pos) = ui.input(|i| i.pointer.hover_pos()) {
        let center = rect.center().to_vec2() + app.viewport.pan_offset;
        let mouse_rel = mouse_pos.to_vec2() - center;
        let scale_change = new_zoom / app.viewport.zoom;
        app.viewport.pan_offset += mouse_rel * (1.0 - scale_change);
    }

    app.viewport.zoom = new_zoom;
}

fn draw_viewing_label(ui: &egui::Ui, rect: egui::Rect, label: &str, failed: bool) {
    if label.is_empty() {
        return;
    }
    let text = if failed {
        format!("{label}  (tracker lost the spot)")
    } else {
        label.to_string()
    };
    ui.painter().text(
        rect.left_top() + egui::vec2(8.0, 8.0),
        egui::Align2::LEFT_TOP,
        text,
        egui::FontId::proportional(14.0),
        egui::Color32::from_white_alpha(200),
    );
}
