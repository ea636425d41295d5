//! Main application UI and state management.
//! Browsing, memorization sessions, tasbeeh, Qibla and the word glossary.

use dua_review::clock::{Clock, ManualClock, SystemClock, format_millis};
use dua_review::config::Config;
use dua_review::export::json::{export_json_to_path, import_json};
use dua_review::models::{RateOutcome, Swipe};
use dua_review::tools::{DHIKR_LIST, Needle, TapOutcome, Tasbeeh, lexicon, qibla_bearing};
use dua_review::{
    DuaCollection, FlashcardSession, ItemId, PersistenceStore, Rating, ReadingProgress,
    ReviewScheduler, search,
};
use eframe::egui;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::warn;

/// Application screen states
#[derive(Clone, Copy, PartialEq, Eq)]
enum AppScreen {
    Browse,
    Memorize,
    Tasbeeh,
    Qibla,
    Glossary,
}

/// Main application state
pub struct DuaApp {
    config: Config,
    collection: DuaCollection,
    scheduler: ReviewScheduler,
    session: FlashcardSession,
    progress: ReadingProgress,
    tasbeeh: Tasbeeh,
    clock: Arc<dyn Clock>,
    sim_clock: Option<Arc<ManualClock>>,

    current_screen: AppScreen,
    search_query: String,
    active_category: Option<String>,
    drag_total: egui::Vec2,

    latitude: String,
    longitude: String,
    heading: f64,
    bearing: Option<f64>,
    needle: Needle,

    glossary_input: String,

    show_confirmation_dialog: bool,
    allowed_to_close: bool,
    show_result_dialog: bool,
    result_message: String,
    status: Option<String>,
}

impl eframe::App for DuaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render_top_bar(ctx);

        match self.current_screen {
            AppScreen::Browse => self.render_browse_screen(ctx),
            AppScreen::Memorize => self.render_memorize_screen(ctx),
            AppScreen::Tasbeeh => self.render_tasbeeh_screen(ctx),
            AppScreen::Qibla => self.render_qibla_screen(ctx),
            AppScreen::Glossary => self.render_glossary_screen(ctx),
        }

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_confirmation_dialog = true;
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.tasbeeh.close();
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }

        if self.show_result_dialog {
            egui::Window::new("Import/Export Result")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&self.result_message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.show_result_dialog = false;
                    }
                });
        }
    }
}

impl DuaApp {
    pub fn new(
        config: Config,
        collection: DuaCollection,
        store: Arc<dyn PersistenceStore>,
        sim_clock: Option<Arc<ManualClock>>,
    ) -> Self {
        let clock: Arc<dyn Clock> = match &sim_clock {
            Some(sim) => sim.clone(),
            None => Arc::new(SystemClock),
        };

        let scheduler = ReviewScheduler::load(store.clone(), clock.clone());
        let mut progress = ReadingProgress::load(store.clone());
        progress.check_streak(clock.today());
        progress.track_activity(clock.today());
        let tasbeeh = Tasbeeh::open(store);

        Self {
            config,
            collection,
            scheduler,
            session: FlashcardSession::new(),
            progress,
            tasbeeh,
            clock,
            sim_clock,
            current_screen: AppScreen::Browse,
            search_query: String::new(),
            active_category: None,
            drag_total: egui::Vec2::ZERO,
            latitude: "34.5553".to_string(),
            longitude: "69.2075".to_string(),
            heading: 0.0,
            bearing: None,
            needle: Needle::default(),
            glossary_input: String::new(),
            show_confirmation_dialog: false,
            allowed_to_close: false,
            show_result_dialog: false,
            result_message: String::new(),
            status: None,
        }
    }

    /// Screen tabs, the current date and the simulated "Next Day" control
    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let due = self.scheduler.due_count(self.clock.now_millis());

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.current_screen, AppScreen::Browse, "Browse");
                let memorize_label = if due > 0 {
                    format!("Memorize ({} due)", due)
                } else {
                    "Memorize".to_string()
                };
                ui.selectable_value(&mut self.current_screen, AppScreen::Memorize, memorize_label);
                ui.selectable_value(&mut self.current_screen, AppScreen::Tasbeeh, "Tasbeeh");
                ui.selectable_value(&mut self.current_screen, AppScreen::Qibla, "Qibla");
                ui.selectable_value(&mut self.current_screen, AppScreen::Glossary, "Glossary");
            });

            ui.horizontal(|ui| {
                ui.label(format_millis(self.clock.now_millis()));
                if let Some(sim) = &self.sim_clock {
                    if ui.button("Next Day").clicked() {
                        sim.advance_days(1);
                        self.progress.check_streak(sim.today());
                        self.progress.track_activity(sim.today());
                    }
                }
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status);
                }
            });
        });
    }

    /// Renders the collection with search, category filter and per-dua actions
    fn render_browse_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let today = self.clock.today();
            ui.horizontal(|ui| {
                ui.label(format!(
                    "Read {}/{} ({}%)",
                    self.progress.read_in(&self.collection),
                    self.collection.len(),
                    self.progress.read_percent(&self.collection)
                ));
                ui.separator();
                ui.label(format!("Saved {}", self.progress.bookmarks().len()));
                ui.separator();
                ui.label(format!("Streak {} days", self.progress.streak()));
                ui.separator();
                ui.label(format!("Active {} days", self.progress.active_days()));
            });

            // Last seven days, oldest first
            ui.horizontal(|ui| {
                for offset in (0..7u64).rev() {
                    let Some(day) = today.checked_sub_days(chrono::Days::new(offset)) else {
                        continue;
                    };
                    let mark = if self.progress.was_active(day) { "✓" } else { "·" };
                    let text = egui::RichText::new(format!("{} {}", day.format("%a"), mark));
                    ui.label(if offset == 0 { text.strong() } else { text });
                }
            });

            if let Some(daily) = self.collection.daily(today) {
                ui.group(|ui| {
                    ui.label(egui::RichText::new("Dua of the Day").strong());
                    ui.label(egui::RichText::new(&daily.arabic).size(20.0));
                    ui.label(&daily.translation);
                });
            }

            let achievements = self.progress.achievements(&self.collection);
            let earned = achievements.iter().filter(|a| a.earned).count();
            egui::CollapsingHeader::new(format!(
                "Achievements ({}/{})",
                earned,
                achievements.len()
            ))
            .show(ui, |ui| {
                for achievement in &achievements {
                    let icon = if achievement.earned { "🏆" } else { "🔒" };
                    ui.label(format!(
                        "{} {} - {}",
                        icon, achievement.name, achievement.description
                    ));
                }
            });

            ui.horizontal(|ui| {
                if ui.button("Import Collection").clicked() {
                    self.handle_import();
                }
                if ui.button("Export Bookmarks").clicked() {
                    self.handle_export_bookmarks();
                }
                if ui.button("Reset Reading Progress").clicked() {
                    self.progress.reset_read();
                    self.status = Some("Progress reset".to_string());
                }
            });

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Search:");
                ui.text_edit_singleline(&mut self.search_query);
                if !self.search_query.is_empty() && ui.button("Clear").clicked() {
                    self.search_query.clear();
                }
            });

            let categories = self.collection.categories();
            let selected_text = self.active_category.clone().unwrap_or_else(|| "All".to_string());
            egui::ComboBox::from_label("Category")
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.active_category, None, "All");
                    for category in categories {
                        ui.selectable_value(
                            &mut self.active_category,
                            Some(category.clone()),
                            category,
                        );
                    }
                });

            ui.separator();

            let due: BTreeSet<ItemId> = self
                .scheduler
                .due_items(self.clock.now_millis())
                .into_iter()
                .collect();
            let visible: Vec<ItemId> = search::filter(&self.collection, &self.search_query)
                .into_iter()
                .filter(|dua| match &self.active_category {
                    Some(category) => dua.in_category(category),
                    None => true,
                })
                .map(|dua| dua.id)
                .collect();

            if visible.is_empty() {
                ui.label("No duas match your search");
            }

            // We store actions to execute after UI rendering to avoid borrowing conflicts
            let mut action_bookmark: Option<ItemId> = None;
            let mut action_read: Option<ItemId> = None;

            egui::ScrollArea::vertical()
                .id_salt("duas_list")
                .show(ui, |ui| {
                    for id in &visible {
                        let Some(dua) = self.collection.get(*id) else {
                            continue;
                        };
                        ui.group(|ui| {
                            ui.horizontal(|ui| {
                                ui.strong(format!("{}. {}", dua.id, dua.title));
                                if due.contains(&dua.id) {
                                    ui.colored_label(egui::Color32::LIGHT_RED, "review due");
                                }
                            });
                            ui.label(egui::RichText::new(&dua.arabic).size(20.0));
                            if !dua.transliteration.is_empty() {
                                ui.label(egui::RichText::new(&dua.transliteration).italics());
                            }
                            ui.label(&dua.translation);
                            if !dua.reference.is_empty() {
                                ui.small(&dua.reference);
                            }

                            ui.horizontal(|ui| {
                                let star = if self.progress.is_bookmarked(dua.id) {
                                    "★ Saved"
                                } else {
                                    "☆ Save"
                                };
                                if ui.button(star).clicked() {
                                    action_bookmark = Some(dua.id);
                                }
                                let read = if self.progress.is_read(dua.id) {
                                    "✓ Read"
                                } else {
                                    "✓ Mark Read"
                                };
                                if ui.button(read).clicked() {
                                    action_read = Some(dua.id);
                                }
                            });
                        });
                    }
                });

            // Execute deferred actions
            if let Some(id) = action_bookmark {
                let message = if self.progress.toggle_bookmark(id) {
                    "Added to Bookmarks"
                } else {
                    "Removed from Bookmarks"
                };
                self.status = Some(message.to_string());
            }
            if let Some(id) = action_read {
                self.status = Some(if self.progress.mark_read(id) {
                    format!(
                        "Marked as Read ({}/{})",
                        self.progress.read_in(&self.collection),
                        self.collection.len()
                    )
                } else {
                    "Already marked as read".to_string()
                });
            }
        });
    }

    /// Renders the flashcard memorization session
    fn render_memorize_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Memorize");

            if let Some(error) = self.scheduler.last_save_error() {
                ui.colored_label(
                    egui::Color32::YELLOW,
                    format!("Review progress could not be saved: {}", error),
                );
            }

            if !self.session.is_open() {
                let now = self.clock.now_millis();
                ui.label(format!(
                    "{} rated, {} due for review",
                    self.scheduler.len(),
                    self.scheduler.due_count(now)
                ));
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    if ui.button("Start Session").clicked() {
                        self.session.open(&self.collection);
                    }
                    if ui.button("Reset Review Progress").clicked() {
                        self.scheduler.reset();
                        self.status = Some("Review progress reset".to_string());
                    }
                });
                return;
            }

            let Some(card) = self.session.current_card().cloned() else {
                ui.label("No cards to study!");
                if ui.button("Close").clicked() {
                    self.session.close();
                }
                return;
            };

            let progress = self.session.progress();
            ui.horizontal(|ui| {
                ui.label(format!("Card {} of {}", progress.current, progress.total));
                if self.scheduler.is_due(card.item_id, self.clock.now_millis()) {
                    ui.colored_label(egui::Color32::LIGHT_RED, "review due");
                }
            });
            ui.add(egui::ProgressBar::new(progress.fraction()));
            ui.add_space(10.0);

            let flipped = self.session.is_flipped();
            let card_response = ui
                .group(|ui| {
                    ui.set_min_height(220.0);
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.label(egui::RichText::new(&card.front).size(26.0));
                        ui.add_space(20.0);
                        if flipped {
                            for line in &card.back {
                                ui.label(line);
                            }
                            ui.add_space(10.0);
                            ui.small(card.reference_or_title());
                        } else {
                            ui.label("(Click the card to reveal)");
                        }
                    });
                })
                .response
                .interact(egui::Sense::click_and_drag());

            // Store actions to execute after UI rendering
            let mut action_flip = card_response.clicked();
            let mut action_swipe: Option<Swipe> = None;
            let mut action_rate: Option<Rating> = None;
            let mut action_close = false;

            if card_response.dragged() {
                self.drag_total += card_response.drag_delta();
            }
            if card_response.drag_stopped() {
                action_swipe = Swipe::from_delta(self.drag_total.x, self.drag_total.y);
                self.drag_total = egui::Vec2::ZERO;
            }

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.button("◀ Previous").clicked() {
                    action_swipe = Some(Swipe::Right);
                }
                if ui.button("Flip").clicked() {
                    action_flip = true;
                }
                if ui.button("Next ▶").clicked() {
                    action_swipe = Some(Swipe::Left);
                }
            });

            // Rating buttons only after revealing the back
            if flipped {
                ui.label("How well did you remember it?");
                ui.horizontal(|ui| {
                    for rating in Rating::ALL {
                        let label = match rating {
                            Rating::Hard => "Hard",
                            Rating::Good => "Good",
                            Rating::Easy => "Easy",
                        };
                        if ui.button(label).clicked() {
                            action_rate = Some(rating);
                        }
                    }
                });
            }

            ui.add_space(20.0);
            if ui.button("End Session").clicked() {
                action_close = true;
            }

            // Execute deferred actions
            if action_flip {
                self.session.flip();
            }
            if let Some(direction) = action_swipe {
                self.session.swipe(direction);
            }
            if let Some(rating) = action_rate {
                self.rate_current_card(rating);
            }
            if action_close {
                self.session.close();
            }
        });
    }

    fn rate_current_card(&mut self, rating: Rating) {
        match self.session.rate(&mut self.scheduler, rating) {
            Ok(outcome) => {
                let days = outcome.entry().interval.round() as i64;
                self.status = Some(match (outcome, rating) {
                    (RateOutcome::Completed(_), _) => "Review session complete".to_string(),
                    (_, Rating::Hard) => "Will review again tomorrow".to_string(),
                    _ => format!("Next review in {} day{}", days, if days > 1 { "s" } else { "" }),
                });
            }
            Err(e) => {
                warn!("Rating rejected: {}", e);
                self.status = Some(e.to_string());
            }
        }
    }

    /// Renders the dhikr counter
    fn render_tasbeeh_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let dhikr = self.tasbeeh.dhikr();
            let mut action_select: Option<usize> = None;

            egui::ComboBox::from_label("Dhikr")
                .selected_text(dhikr.english)
                .show_ui(ui, |ui| {
                    for (i, item) in DHIKR_LIST.iter().enumerate() {
                        if ui
                            .selectable_label(i == self.tasbeeh.selected(), item.english)
                            .clicked()
                        {
                            action_select = Some(i);
                        }
                    }
                });

            ui.vertical_centered(|ui| {
                ui.add_space(10.0);
                ui.label(egui::RichText::new(dhikr.arabic).size(26.0));
                ui.small(dhikr.virtue);
                ui.add_space(10.0);
                ui.label(egui::RichText::new(self.tasbeeh.count().to_string()).size(48.0));
                let target = self.tasbeeh.target();
                ui.label(if target == 0 {
                    "OPEN COUNT".to_string()
                } else {
                    format!("TARGET: {}", target)
                });
                ui.add_space(10.0);

                if ui
                    .add_sized([180.0, 80.0], egui::Button::new("Tap"))
                    .clicked()
                {
                    if let TapOutcome::TargetReached(_) = self.tasbeeh.tap() {
                        self.status = Some("Target reached! Count saved.".to_string());
                    }
                }
            });

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                for preset in [33, 100, 0] {
                    let label = if preset == 0 {
                        "Open".to_string()
                    } else {
                        preset.to_string()
                    };
                    if ui.button(label).clicked() {
                        self.tasbeeh.set_target(preset);
                    }
                }
                if ui.button("Reset").clicked() {
                    self.tasbeeh.reset();
                }
            });

            ui.separator();
            ui.heading(format!("Lifetime total: {}", self.tasbeeh.overall_total()));
            for (id, total) in self.tasbeeh.totals() {
                let name = DHIKR_LIST
                    .iter()
                    .find(|d| d.id == id)
                    .map(|d| d.english)
                    .unwrap_or(id.as_str());
                ui.label(format!("{}: {}", name, total));
            }

            if let Some(index) = action_select {
                self.tasbeeh.select(index);
            }
        });
    }

    /// Renders the Qibla bearing and a compass needle
    fn render_qibla_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Latitude:");
                ui.text_edit_singleline(&mut self.latitude);
            });
            ui.horizontal(|ui| {
                ui.label("Longitude:");
                ui.text_edit_singleline(&mut self.longitude);
            });

            if ui.button("Find Qibla").clicked() {
                match (
                    self.latitude.trim().parse::<f64>(),
                    self.longitude.trim().parse::<f64>(),
                ) {
                    (Ok(lat), Ok(lng)) if (-90.0..=90.0).contains(&lat) => {
                        self.bearing = Some(qibla_bearing(lat, lng));
                    }
                    _ => self.status = Some("Enter a valid latitude and longitude".to_string()),
                }
            }

            let Some(bearing) = self.bearing else {
                return;
            };

            ui.label(format!("Qibla bearing: {}° from North", bearing.round()));
            ui.add(egui::Slider::new(&mut self.heading, 0.0..=359.0).text("Device heading"));
            self.needle
                .point_to(Needle::relative_to_heading(bearing, self.heading));

            let (response, painter) =
                ui.allocate_painter(egui::Vec2::splat(180.0), egui::Sense::hover());
            let center = response.rect.center();
            let angle = self.needle.rotation().to_radians() as f32;
            let tip = center + egui::vec2(angle.sin(), -angle.cos()) * 70.0;
            painter.circle_stroke(
                center,
                80.0,
                egui::Stroke::new(2.0, ui.visuals().text_color()),
            );
            painter.line_segment([center, tip], egui::Stroke::new(4.0, egui::Color32::GOLD));
        });
    }

    /// Renders word-by-word glosses for pasted Arabic text
    fn render_glossary_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label("Paste Arabic text:");
            ui.text_edit_multiline(&mut self.glossary_input);
            ui.separator();

            egui::ScrollArea::vertical()
                .id_salt("glossary")
                .show(ui, |ui| {
                    egui::Grid::new("glossary_grid").striped(true).show(ui, |ui| {
                        for gloss in self.glossary_input.split_whitespace().filter_map(lexicon::lookup) {
                            ui.label(egui::RichText::new(&gloss.word).size(18.0));
                            ui.label(gloss.root.as_deref().unwrap_or("-"));
                            ui.label(gloss.meaning.as_deref().unwrap_or("Not in glossary"));
                            ui.end_row();
                        }
                    });
                });
        });
    }

    /// Replaces the collection with one loaded from a JSON file
    fn handle_import(&mut self) {
        // Open file selection dialog
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        {
            match import_json(&path) {
                Ok(collection) => {
                    self.result_message = format!(
                        "Collection '{}' imported successfully with {} duas!",
                        collection.name,
                        collection.len()
                    );
                    self.collection = collection;
                    self.session.close();

                    self.config.content.path = Some(path);
                    if let Err(e) = self.config.save() {
                        warn!("Failed to save config: {}", e);
                    }
                }
                Err(e) => {
                    self.result_message = format!(
                        "Import failed: {}\n\nPlease check if the file has correct structure:\n{{\n  \"name\": \"Collection Name\",\n  \"duas\": [...]\n}}",
                        e
                    );
                }
            }
            self.show_result_dialog = true;
        }
    }

    /// Exports bookmarked duas as a collection
    fn handle_export_bookmarks(&mut self) {
        let bookmarks = self
            .collection
            .subset("Bookmarks", self.progress.bookmarks());
        if bookmarks.is_empty() {
            self.result_message = "No bookmarks to export yet.".to_string();
            self.show_result_dialog = true;
            return;
        }

        // Open file save dialog
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name("bookmarks.json")
            .add_filter("JSON files", &["json"])
            .save_file()
        {
            self.result_message = match export_json_to_path(&bookmarks, &path) {
                Ok(()) => format!("{} bookmarked duas exported successfully!", bookmarks.len()),
                Err(e) => format!("Export failed: {}", e),
            };
            self.show_result_dialog = true;
        }
    }
}
