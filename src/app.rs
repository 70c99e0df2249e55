//! Application shell and eframe integration.
//!
//! Owns the shared state, schedules feed refreshes, routes pointer input to
//! the view and hit-tester, and drives one scene repaint per frame.

use chrono::Utc;
use eframe::egui;

use crate::catalog::{self, SpacecraftCatalog};
use crate::config::{AppConfig, FeedMode};
use crate::detail::{DetailPanel, DetailView};
use crate::feed::FeedWorker;
use crate::projection::{place_markers, CanvasGeometry};
use crate::roster::CrewRoster;
use crate::scene::{SceneRenderer, StarField};
use crate::state::AppState;
use crate::view::{hit_test, PointerEvent, ViewState};

pub(crate) struct App {
    config: AppConfig,
    catalog: SpacecraftCatalog,
    fallback: CrewRoster,
    state: AppState,
    view: ViewState,
    geometry: CanvasGeometry,
    renderer: SceneRenderer,
    detail: DetailPanel,
    feed: FeedWorker,
    next_roster_refresh: f64,
    next_position_refresh: f64,
}

impl App {
    pub(crate) fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let catalog = SpacecraftCatalog::builtin().unwrap_or_else(|e| {
            log::error!("{}", e);
            SpacecraftCatalog::default()
        });
        let fallback = catalog::fallback_roster().unwrap_or_else(|e| {
            log::error!("{}", e);
            CrewRoster { number: 0, people: Vec::new() }
        });

        let v = &config.view;
        let geometry = CanvasGeometry::new(v.canvas_size as f64, v.earth_radius, v.orbit_altitude);
        let stars = StarField::generate(v.star_count, v.canvas_size, v.canvas_size, v.star_seed);

        log::info!(
            "Starting in {:?} mode, tracking {}",
            config.feed.mode,
            config.feed.tracked_craft
        );

        Self {
            catalog,
            fallback,
            state: AppState::default(),
            view: ViewState::new(v.drag_scale),
            geometry,
            renderer: SceneRenderer::new(geometry, stars),
            detail: DetailPanel::default(),
            feed: FeedWorker::new(),
            next_roster_refresh: 0.0,
            next_position_refresh: 0.0,
            config,
        }
    }

    fn schedule_refreshes(&mut self, ctx: &egui::Context, time: f64) {
        let feed = &self.config.feed;

        if time >= self.next_roster_refresh {
            self.next_roster_refresh = time + feed.roster_interval_secs;
            match feed.mode {
                FeedMode::Live => {
                    let ticket = self.state.begin_roster_refresh();
                    self.feed.spawn_roster(ticket, feed, ctx);
                }
                FeedMode::Simulated => self.state.use_fallback_roster(&self.fallback),
            }
        }

        if time >= self.next_position_refresh {
            self.next_position_refresh = time + feed.position_period();
            match feed.mode {
                FeedMode::Live => {
                    let ticket = self.state.begin_position_refresh();
                    self.feed.spawn_position(ticket, feed, ctx);
                }
                FeedMode::Simulated => {
                    self.state.advance_simulated(&feed.tracked_craft, Utc::now().timestamp());
                }
            }
        }
    }

    fn apply_feed_results(&mut self) {
        for message in self.feed.drain() {
            self.state.apply(message, &self.fallback, Utc::now().timestamp());
        }
    }

    fn show_header(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Humans in Space");
                ui.separator();
                match self.state.roster() {
                    Some(roster) => {
                        ui.label(
                            egui::RichText::new(roster.number.to_string())
                                .strong()
                                .size(18.0)
                                .color(crate::scene::COLOR_MARKER),
                        );
                        ui.label("people in orbit right now");
                    }
                    None => {
                        ui.spinner();
                        ui.label("Loading crew…");
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(format!("v{} {}", env!("CARGO_PKG_VERSION"), env!("GIT_HASH")))
                            .small()
                            .weak(),
                    );
                    if self.config.feed.mode == FeedMode::Simulated {
                        ui.label(
                            egui::RichText::new(format!("simulated orbit {:.2} rad", self.state.simulated_angle()))
                                .small(),
                        );
                    }
                    if let Some(source) = self.state.roster_source() {
                        ui.label(egui::RichText::new(format!("roster: {}", source.label())).small());
                    }
                    if self.state.requests_in_flight() > 0 {
                        ui.spinner();
                    }
                });
            });
        });
    }

    fn pointer_events(&self, ctx: &egui::Context, rect: egui::Rect, modal: bool) -> Vec<PointerEvent> {
        ctx.input(|i| {
            let mut events = Vec::new();
            let pos = i.pointer.latest_pos();
            let inside = pos.is_some_and(|p| rect.contains(p));
            let x = pos.map_or(0.0, |p| (p.x - rect.min.x) as f64);

            if !modal && inside && i.pointer.primary_pressed() {
                events.push(PointerEvent::Press { x });
            }
            if inside && i.pointer.delta() != egui::Vec2::ZERO {
                events.push(PointerEvent::Move { x });
            }
            if i.pointer.primary_released() {
                events.push(PointerEvent::Release);
            }
            if !inside {
                events.push(PointerEvent::Leave);
            }
            events
        })
    }

    fn open_detail(&mut self, craft: &str, crew: &[String]) {
        let view = DetailView::new(
            craft,
            crew,
            &self.catalog,
            self.state.position(craft).copied(),
            &self.config.links.encyclopedia_base,
        );
        self.detail.open(view);
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let time = ctx.input(|i| i.time);

        self.schedule_refreshes(ctx, time);
        self.apply_feed_results();

        let modal = self.detail.is_open();
        let mut click_consumed = false;
        if modal {
            if let Some(pos) = ctx.input(|i| i.pointer.primary_clicked().then(|| i.pointer.interact_pos()).flatten()) {
                click_consumed = self.detail.dismiss_on_outside_click(pos);
            }
        }

        self.show_header(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::central_panel(&ctx.style()).fill(crate::scene::COLOR_SKY))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    let size = egui::Vec2::splat(self.config.view.canvas_size);
                    let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
                    let rect = response.rect;

                    for event in self.pointer_events(ctx, rect, modal) {
                        self.view.handle(event);
                    }

                    let groups = self.state.craft_groups();
                    let rotation = self.view.rotation();
                    let markers = place_markers(&groups, self.state.positions(), rotation, &self.geometry);

                    if !modal && !click_consumed && response.clicked() {
                        if let Some(pos) = response.interact_pointer_pos() {
                            let (x, y) = ((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);
                            let hit = hit_test(&markers, x, y, self.config.view.hit_radius)
                                .and_then(|m| groups.iter().find(|g| g.craft == m.craft));
                            if let Some(group) = hit {
                                self.open_detail(&group.craft, &group.crew);
                            }
                        }
                    }

                    self.renderer.paint(&painter, rect.min, rotation, time, &markers);

                    if self.view.is_dragging() {
                        ctx.set_cursor_icon(egui::CursorIcon::Grabbing);
                    } else if response.hovered() {
                        ctx.set_cursor_icon(egui::CursorIcon::Grab);
                    }
                });
            });

        self.detail.show(ctx);

        self.view.advance(self.config.view.rotation_step);
        ctx.request_repaint();
    }
}
