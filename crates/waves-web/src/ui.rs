//! Player panel drawn from a [`PlayerSnapshot`].
//!
//! Drawing never touches the session; every interaction is reported as a
//! [`UiAction`] and applied by the caller after the frame.

use egui::ecolor::Hsva;
use egui::{Color32, Pos2, Rect, Sense, Vec2};
use waves_core::{format_time, MediaKind, PlayerCommand, PlayerSnapshot, TransportPhase};

const VISUALIZER_HEIGHT: f32 = 120.0;
const BAR_GAP: f32 = 2.0;
const ACCENT: Color32 = Color32::from_rgb(100, 200, 255);

#[derive(Clone, Debug, PartialEq)]
pub enum UiAction {
    /// Open the file picker.
    AddMedia,
    Command(PlayerCommand),
}

/// Rainbow across the bar row, red at the low end.
pub fn bar_color(index: usize, count: usize) -> Color32 {
    let hue = index as f32 / count.max(1) as f32;
    Hsva::new(hue, 0.8, 0.9, 1.0).into()
}

/// Lay out one bar per height (percent of `rect`), bottom aligned.
pub fn bar_rects(rect: Rect, heights: &[f32]) -> Vec<Rect> {
    if heights.is_empty() {
        return Vec::new();
    }
    let bar_width = rect.width() / heights.len() as f32;
    heights
        .iter()
        .enumerate()
        .map(|(i, &percent)| {
            let height = rect.height() * percent.clamp(0.0, 100.0) / 100.0;
            let x = rect.left() + i as f32 * bar_width;
            Rect::from_min_max(
                Pos2::new(x, rect.bottom() - height),
                Pos2::new(x + (bar_width - BAR_GAP).max(1.0), rect.bottom()),
            )
        })
        .collect()
}

pub fn player_panel(
    ui: &mut egui::Ui,
    snapshot: &PlayerSnapshot,
    last_error: Option<&str>,
    actions: &mut Vec<UiAction>,
) {
    ui.horizontal(|ui| {
        ui.heading("WAVES");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("➕ Add media").clicked() {
                actions.push(UiAction::AddMedia);
            }
        });
    });
    ui.separator();

    draw_visualizer(ui, snapshot);
    ui.add_space(8.0);

    if let Some(entry) = snapshot.current() {
        let icon = match entry.kind {
            MediaKind::Audio => "🎵",
            MediaKind::Video => "🎬",
        };
        ui.label(format!("{icon} {}", entry.name));
        draw_progress(ui, snapshot, actions);
        draw_controls(ui, snapshot, actions);
    } else {
        ui.colored_label(Color32::GRAY, "No track selected");
    }

    if let Some(err) = last_error {
        ui.colored_label(Color32::from_rgb(255, 100, 100), format!("⚠ {err}"));
    }

    ui.add_space(8.0);
    draw_playlist(ui, snapshot, actions);
}

fn draw_visualizer(ui: &mut egui::Ui, snapshot: &PlayerSnapshot) {
    let (rect, _) = ui.allocate_exact_size(
        Vec2::new(ui.available_width(), VISUALIZER_HEIGHT),
        Sense::hover(),
    );
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 4.0, Color32::from_gray(20));

    if snapshot.phase == TransportPhase::Empty {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Add some media to get started",
            egui::FontId::proportional(14.0),
            Color32::GRAY,
        );
        return;
    }
    if !snapshot.visualizer_available {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Visualizer unavailable",
            egui::FontId::proportional(14.0),
            Color32::GRAY,
        );
        return;
    }

    let heights: Vec<f32> = snapshot.spectrum.bar_heights().collect();
    let bars = bar_rects(rect.shrink(4.0), &heights);
    let count = bars.len();
    for (i, bar) in bars.into_iter().enumerate() {
        painter.rect_filled(bar, 1.0, bar_color(i, count));
    }
}

fn draw_progress(ui: &mut egui::Ui, snapshot: &PlayerSnapshot, actions: &mut Vec<UiAction>) {
    let clock = &snapshot.clock;
    ui.horizontal(|ui| {
        ui.label(format_time(clock.current_time));

        let mut percent = clock.progress_percent();
        let slider = egui::Slider::new(&mut percent, 0.0..=100.0)
            .show_value(false)
            .trailing_fill(true);
        let response = ui.add_enabled(clock.duration.is_some(), slider);
        if response.changed() {
            actions.push(UiAction::Command(PlayerCommand::Seek(percent / 100.0)));
        }

        ui.label(clock.duration.map_or_else(|| "-:--".to_owned(), format_time));
    });
}

fn draw_controls(ui: &mut egui::Ui, snapshot: &PlayerSnapshot, actions: &mut Vec<UiAction>) {
    ui.horizontal(|ui| {
        if ui.button("⏮").clicked() {
            actions.push(UiAction::Command(PlayerCommand::Previous));
        }

        let play_pause_icon = if snapshot.is_playing { "⏸" } else { "▶" };
        if ui.button(play_pause_icon).clicked() {
            actions.push(UiAction::Command(PlayerCommand::TogglePlay));
        }

        if ui.button("⏭").clicked() {
            actions.push(UiAction::Command(PlayerCommand::Next));
        }

        if ui.button("⏹").clicked() {
            actions.push(UiAction::Command(PlayerCommand::Stop));
        }

        ui.add_space(12.0);
        ui.label("🔊");
        let mut volume = snapshot.volume;
        if ui
            .add(egui::Slider::new(&mut volume, 0.0..=1.0).show_value(false))
            .changed()
        {
            actions.push(UiAction::Command(PlayerCommand::SetVolume(volume)));
        }
    });
}

fn draw_playlist(ui: &mut egui::Ui, snapshot: &PlayerSnapshot, actions: &mut Vec<UiAction>) {
    if snapshot.entries.is_empty() {
        return;
    }
    ui.label(format!("Playlist ({}):", snapshot.entries.len()));

    egui::ScrollArea::vertical()
        .max_height(240.0)
        .id_salt("playlist_scroll")
        .show(ui, |ui| {
            for (idx, entry) in snapshot.entries.iter().enumerate() {
                let is_current = snapshot.is_current(idx);
                let bg_color = if is_current {
                    Color32::from_rgba_unmultiplied(100, 200, 255, 30)
                } else {
                    Color32::TRANSPARENT
                };

                egui::Frame::new()
                    .fill(bg_color)
                    .inner_margin(4.0)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            if is_current && snapshot.is_playing {
                                ui.colored_label(ACCENT, "▶");
                            } else {
                                ui.label(format!("{}.", idx + 1));
                            }

                            let label = egui::Label::new(&entry.name).sense(Sense::click());
                            if ui.add(label).clicked() {
                                actions.push(UiAction::Command(PlayerCommand::SelectAndPlay(idx)));
                            }

                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.small_button("✕").clicked() {
                                    actions
                                        .push(UiAction::Command(PlayerCommand::Remove(entry.id.clone())));
                                }
                            });
                        });
                    });
            }
        });

    ui.add_space(4.0);
    if ui.button("🗑 Clear playlist").clicked() {
        actions.push(UiAction::Command(PlayerCommand::Clear));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waves_core::{ClockState, EntryView, MediaId, SpectrumFrame};

    fn snapshot(entries: usize, current: Option<usize>) -> PlayerSnapshot {
        PlayerSnapshot {
            entries: (0..entries)
                .map(|i| EntryView {
                    id: MediaId::from(format!("id{i}").as_str()),
                    name: format!("track {i}"),
                    kind: MediaKind::Audio,
                })
                .collect(),
            current_index: current,
            phase: if current.is_some() {
                TransportPhase::Paused
            } else {
                TransportPhase::Empty
            },
            is_playing: false,
            clock: ClockState::default(),
            volume: 0.7,
            spectrum: SpectrumFrame::default(),
            visualizer_available: true,
        }
    }

    fn render(snapshot: &PlayerSnapshot, last_error: Option<&str>) -> Vec<UiAction> {
        let ctx = egui::Context::default();
        let mut actions = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                player_panel(ui, snapshot, last_error, &mut actions);
            });
        });
        actions
    }

    #[test]
    fn bars_fill_the_rect_bottom_aligned() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(320.0, 100.0));
        let bars = bar_rects(rect, &[5.0, 50.0, 100.0, 0.0]);
        assert_eq!(bars.len(), 4);
        assert!(bars.iter().all(|b| b.bottom() == 100.0));
        assert_eq!(bars[0].height(), 5.0);
        assert_eq!(bars[1].height(), 50.0);
        assert_eq!(bars[2].height(), 100.0);
        assert_eq!(bars[3].left(), 240.0);
        assert!(bars[3].right() <= rect.right());
    }

    #[test]
    fn bars_clamp_out_of_range_heights() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(10.0, 50.0));
        let bars = bar_rects(rect, &[250.0, -3.0]);
        assert_eq!(bars[0].height(), 50.0);
        assert_eq!(bars[1].height(), 0.0);
        assert!(bar_rects(rect, &[]).is_empty());
    }

    #[test]
    fn silent_frame_still_draws_floor_bars() {
        let heights: Vec<f32> = SpectrumFrame::default().bar_heights().collect();
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(64.0, 100.0));
        let bars = bar_rects(rect, &heights);
        assert_eq!(bars.len(), waves_core::BUCKET_COUNT);
        assert!(bars.iter().all(|b| b.height() == waves_core::MIN_BAR_PERCENT));
    }

    #[test]
    fn panel_renders_without_input_actions() {
        assert!(render(&snapshot(0, None), None).is_empty());
        assert!(render(&snapshot(3, Some(1)), Some("playback failed")).is_empty());

        let mut unavailable = snapshot(2, Some(0));
        unavailable.visualizer_available = false;
        unavailable.clock.duration = Some(90.0);
        assert!(render(&unavailable, None).is_empty());
    }

    #[test]
    fn bar_colors_sweep_the_hue_wheel() {
        let low = bar_color(0, 32);
        assert!(low.r() > low.g() && low.r() > low.b());
        assert_ne!(bar_color(0, 32), bar_color(16, 32));
        assert_eq!(bar_color(0, 0), low);
    }
}
