#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::cell::Cell;
use std::rc::Rc;

use eframe::egui;
use egui_drag_handle::{DisplayAttributes, DragHandle, PointerHub, PointerHubOptions};

struct NotebookCell {
    title: String,
    body: String,
    offset: Rc<Cell<egui::Vec2>>,
    handle: DragHandle,
}

struct App {
    hub: PointerHub,
    cells: Vec<NotebookCell>,
    show_debug_log: bool,
}

impl Default for App {
    fn default() -> Self {
        let hub = PointerHub::new(PointerHubOptions {
            debug_event_log: true,
            ..Default::default()
        });

        let cells = [
            ("In [1]", "tracker = Tracker(\"gaze.tsv\")"),
            ("In [2]", "fixations = tracker.fixations(filter=\"ivt\")"),
            ("Out [2]", "412 fixations, 38 edits"),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (title, body))| {
            let offset = Rc::new(Cell::new(egui::vec2(40.0, 60.0 + 120.0 * i as f32)));
            let handle = DragHandle::new(hub.registry())
                .with_on_drag({
                    let offset = Rc::clone(&offset);
                    move |delta| offset.set(offset.get() + delta)
                })
                .with_attributes(
                    DisplayAttributes::default()
                        .hover_text("Drag the header to move this cell")
                        .id_salt(("cell_header", i)),
                );
            NotebookCell {
                title: title.to_owned(),
                body: body.to_owned(),
                offset,
                handle,
            }
        })
        .collect();

        Self {
            hub,
            cells,
            show_debug_log: false,
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.hub.begin_frame(ctx);

        egui::TopBottomPanel::top("notebook_cells_help").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Drag a cell by its header. Hidden cells drop their drag.");
                ui.checkbox(&mut self.show_debug_log, "Debug log");
            });
        });

        egui::CentralPanel::default().show(ctx, |_ui| {});

        let hub = &self.hub;
        for (i, cell) in self.cells.iter().enumerate() {
            egui::Area::new(egui::Id::new(("cell", i)))
                .fixed_pos(cell.offset.get().to_pos2())
                .show(ctx, |ui| {
                    egui::Frame::window(ui.style()).show(ui, |ui| {
                        ui.set_width(320.0);
                        cell.handle.ui(ui, hub, |ui| {
                            ui.horizontal(|ui| {
                                ui.strong(&cell.title);
                                ui.allocate_space(egui::vec2(ui.available_width(), 0.0));
                            });
                        });
                        ui.separator();
                        ui.monospace(&cell.body);
                    });
                });
        }

        if self.show_debug_log {
            egui::Window::new("Drag debug log").show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.monospace(self.hub.debug_log_text());
                });
            });
        }

        self.hub.end_frame(ctx);
    }
}

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_title("egui_drag_handle demo"),
        ..Default::default()
    };

    eframe::run_native(
        "egui_drag_handle demo",
        options,
        Box::new(|_cc| Ok(Box::new(App::default()))),
    )
}
