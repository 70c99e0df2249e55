//! Spacecraft detail panel: position, crew and mission timeline.

use eframe::egui;

use crate::catalog::{SpacecraftCatalog, SpacecraftInfo};
use crate::position::SpacecraftPosition;

pub fn encyclopedia_url(base: &str, name: &str) -> String {
    format!("{}{}", base, name.replace(' ', "_"))
}

#[derive(Clone, Debug, PartialEq)]
pub struct CrewLink {
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DetailView {
    pub craft: String,
    pub info: SpacecraftInfo,
    pub position: Option<SpacecraftPosition>,
    pub crew: Vec<CrewLink>,
}

impl DetailView {
    pub fn new(
        craft: &str,
        crew: &[String],
        catalog: &SpacecraftCatalog,
        position: Option<SpacecraftPosition>,
        encyclopedia_base: &str,
    ) -> Self {
        Self {
            craft: craft.to_string(),
            info: catalog.info_or_placeholder(craft),
            position,
            crew: crew
                .iter()
                .map(|name| CrewLink {
                    name: name.clone(),
                    url: encyclopedia_url(encyclopedia_base, name),
                })
                .collect(),
        }
    }

    pub fn title(&self) -> &str {
        &self.info.full_name
    }

    pub fn crew_heading(&self) -> String {
        format!("Current Crew ({})", self.crew.len())
    }
}

pub fn format_degrees(value: f64) -> String {
    format!("{:.4}°", value)
}

/// Modal wrapper around the open detail view.
#[derive(Default)]
pub struct DetailPanel {
    view: Option<DetailView>,
    rect: Option<egui::Rect>,
}

impl DetailPanel {
    pub fn is_open(&self) -> bool {
        self.view.is_some()
    }

    pub fn open(&mut self, view: DetailView) {
        log::debug!("Showing details for {}", view.craft);
        self.view = Some(view);
        self.rect = None;
    }

    pub fn close(&mut self) {
        self.view = None;
        self.rect = None;
    }

    /// Closes the panel when a click lands outside its last drawn area.
    /// Returns whether the click was consumed.
    pub fn dismiss_on_outside_click(&mut self, click: egui::Pos2) -> bool {
        if self.view.is_none() {
            return false;
        }
        if self.rect.is_some_and(|rect| !rect.contains(click)) {
            self.close();
        }
        true
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        let Some(view) = self.view.as_ref() else {
            return;
        };

        let mut open = true;
        let mut links: Vec<String> = Vec::new();
        let response = egui::Window::new(view.title())
            .id(egui::Id::new("craft_detail"))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .default_width(380.0)
            .show(ctx, |ui| {
                show_detail_body(ui, view, &mut links);
            });

        for url in links {
            ctx.open_url(egui::OpenUrl::new_tab(url));
        }

        if open {
            self.rect = response.map(|r| r.response.rect);
        } else {
            self.close();
        }
    }
}

fn show_detail_body(ui: &mut egui::Ui, view: &DetailView, links: &mut Vec<String>) {
    let info = &view.info;

    if let Some(pos) = view.position {
        ui.label(egui::RichText::new("Current Position").strong());
        egui::Grid::new("detail_position").num_columns(2).show(ui, |ui| {
            ui.label("Latitude:");
            ui.label(format_degrees(pos.latitude));
            ui.end_row();
            ui.label("Longitude:");
            ui.label(format_degrees(pos.longitude));
            ui.end_row();
        });
        ui.separator();
    }

    egui::Grid::new("detail_info").num_columns(2).show(ui, |ui| {
        ui.label("Launched:");
        ui.label(&info.launched);
        ui.end_row();
        ui.label("Orbit:");
        ui.label(&info.orbit);
        ui.end_row();
        ui.label("Speed:");
        ui.label(&info.speed);
        ui.end_row();
    });
    ui.separator();

    ui.label(egui::RichText::new(view.crew_heading()).strong());
    for member in &view.crew {
        if ui
            .selectable_label(false, &member.name)
            .on_hover_text(&member.url)
            .clicked()
        {
            links.push(member.url.clone());
        }
    }

    if !info.timeline.is_empty() {
        ui.separator();
        ui.label(egui::RichText::new("Mission Timeline").strong());
        for item in &info.timeline {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&item.date).monospace().color(egui::Color32::from_rgb(255, 213, 79)));
                match &item.url {
                    Some(url) => {
                        if ui.selectable_label(false, &item.event).on_hover_text(url).clicked() {
                            links.push(url.clone());
                        }
                    }
                    None => {
                        ui.label(&item.event);
                    }
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIKI: &str = "https://en.wikipedia.org/wiki/";

    #[test]
    fn test_encyclopedia_url() {
        let url = encyclopedia_url(WIKI, "Jasmin Moghbeli");
        assert!(url.ends_with("Jasmin_Moghbeli"));
        assert_eq!(url, "https://en.wikipedia.org/wiki/Jasmin_Moghbeli");
        assert_eq!(encyclopedia_url(WIKI, "Loral O'Hara"), "https://en.wikipedia.org/wiki/Loral_O'Hara");
    }

    #[test]
    fn test_known_craft_detail() {
        let catalog = SpacecraftCatalog::builtin().unwrap();
        let crew = vec!["Jasmin Moghbeli".to_string(), "Andreas Mogensen".to_string()];
        let pos = SpacecraftPosition { latitude: 12.345678, longitude: -45.0, timestamp: 0 };
        let view = DetailView::new("ISS", &crew, &catalog, Some(pos), WIKI);

        assert_eq!(view.title(), "International Space Station");
        assert_eq!(view.crew_heading(), "Current Crew (2)");
        assert_eq!(view.crew[1].url, "https://en.wikipedia.org/wiki/Andreas_Mogensen");
        assert_eq!(view.info.timeline.len(), 5);
        assert_eq!(format_degrees(pos.latitude), "12.3457°");
    }

    #[test]
    fn test_unknown_craft_detail_uses_placeholders() {
        let catalog = SpacecraftCatalog::builtin().unwrap();
        let view = DetailView::new("Shenzhou 17", &["Tang Hongbo".to_string()], &catalog, None, WIKI);

        assert_eq!(view.title(), "Shenzhou 17");
        assert_eq!(view.info.orbit, "Unknown");
        assert!(view.position.is_none());
        assert!(view.info.timeline.is_empty());
    }

    #[test]
    fn test_outside_click_dismisses_only_when_drawn() {
        let catalog = SpacecraftCatalog::default();
        let mut panel = DetailPanel::default();
        assert!(!panel.dismiss_on_outside_click(egui::pos2(0.0, 0.0)));

        panel.open(DetailView::new("ISS", &[], &catalog, None, WIKI));
        // Not drawn yet: the opening click must not close it again.
        assert!(panel.dismiss_on_outside_click(egui::pos2(0.0, 0.0)));
        assert!(panel.is_open());

        panel.rect = Some(egui::Rect::from_min_size(egui::pos2(100.0, 100.0), egui::vec2(200.0, 200.0)));
        assert!(panel.dismiss_on_outside_click(egui::pos2(150.0, 150.0)));
        assert!(panel.is_open());

        assert!(panel.dismiss_on_outside_click(egui::pos2(10.0, 10.0)));
        assert!(!panel.is_open());
        assert!(panel.rect.is_none());
    }
}
