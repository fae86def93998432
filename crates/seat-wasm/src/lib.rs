//! WASM bridge for the seating surface, exposed to the hosting web shell.
//!
//! Compiled via `wasm-pack build --target web`. The shell feeds pointer
//! and key events in displayed pixels and re-renders from `render_svg`.

mod storage;

pub use storage::{BrowserStore, LocalStorageStore};

use seat_core::layout::Viewport;
use seat_core::model::{CustomObject, LayoutFormat, ObjectType, ScoringResult};
use seat_editor::input::InputEvent;
use seat_editor::session::{LayoutSession, SessionOptions};
use seat_editor::tools::{InteractionPhase, Placement};
use seat_render::svg::SvgTheme;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// The main WASM-facing seating controller.
///
/// One instance per rendered surface; a preview and an editor each get
/// their own.
#[wasm_bindgen]
pub struct SeatCanvas {
    session: LayoutSession<BrowserStore>,
}

#[wasm_bindgen]
impl SeatCanvas {
    /// Create a controller from the scoring result JSON.
    ///
    /// `forced_format` is a format tag, or empty to use the stored
    /// preference.
    #[wasm_bindgen(constructor)]
    pub fn new(
        result_json: &str,
        width: f64,
        height: f64,
        forced_format: &str,
        read_only: bool,
    ) -> Result<SeatCanvas, JsValue> {
        console_error_panic_hook_setup();

        let result = ScoringResult::from_json(result_json).map_err(to_js)?;
        let forced_format = parse_forced(forced_format).map_err(to_js)?;
        let session = LayoutSession::new(
            result,
            BrowserStore::default(),
            SessionOptions {
                forced_format,
                read_only,
                viewport: Viewport {
                    width: width as f32,
                    height: height as f32,
                },
            },
        );
        Ok(Self { session })
    }

    // ─── Format API ──────────────────────────────────────────────────────

    pub fn get_format(&self) -> String {
        self.session.format().as_str().to_string()
    }

    pub fn is_format_locked(&self) -> bool {
        self.session.is_format_locked()
    }

    /// Switch format. Returns `true` if the format changed.
    pub fn set_format(&mut self, tag: &str) -> bool {
        let format: LayoutFormat = match tag.parse() {
            Ok(f) => f,
            Err(e) => {
                report(&e.to_string());
                return false;
            }
        };
        match self.session.set_format(format) {
            Ok(changed) => changed,
            Err(e) => {
                // The switch itself went through.
                report(&format!("could not save layout preference: {e}"));
                true
            }
        }
    }

    /// Register `callback(tag)` for format changes.
    pub fn set_on_format_change(&mut self, callback: js_sys::Function) {
        self.session.set_on_format_change(move |format| {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(format.as_str())) {
                log::warn!("format change callback threw: {e:?}");
            }
        });
    }

    /// Persist the active format. `true` lets the shell show a
    /// confirmation.
    pub fn save_preference(&mut self) -> bool {
        match self.session.save_preference() {
            Ok(()) => true,
            Err(e) => {
                report(&e.to_string());
                false
            }
        }
    }

    // ─── Pointer API ─────────────────────────────────────────────────────

    /// Returns `true` if the surface needs a re-render.
    pub fn handle_pointer_down(&mut self, x: f32, y: f32) -> bool {
        let before = self.session.phase();
        self.session.handle_event(&InputEvent::PointerDown { x, y });
        before != self.session.phase()
    }

    pub fn handle_pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.session.handle_event(&InputEvent::PointerMove { x, y }).changed
    }

    pub fn handle_pointer_up(&mut self, x: f32, y: f32) -> bool {
        let before = self.session.phase();
        let changed = self.session.handle_event(&InputEvent::PointerUp { x, y }).changed;
        changed || before != self.session.phase()
    }

    pub fn handle_pointer_leave(&mut self) -> bool {
        let before = self.session.phase();
        self.session.handle_event(&InputEvent::PointerLeave);
        before != self.session.phase()
    }

    /// Handle a click. Returns JSON:
    /// `{"changed":bool, "placement":"created"|"rejected"|"none", "id":"<id>"}`
    pub fn handle_click(&mut self, x: f32, y: f32) -> String {
        let selected = self.session.selected();
        let result = self.session.handle_event(&InputEvent::Click { x, y });
        let (placement, id) = match result.placement {
            Some(Placement::Created(id)) => ("created", id.as_str().to_string()),
            Some(Placement::Rejected) => ("rejected", String::new()),
            None => ("none", String::new()),
        };
        serde_json::json!({
            "changed": result.changed || selected != self.session.selected(),
            "placement": placement,
            "id": id,
        })
        .to_string()
    }

    // ─── Keyboard & tools ────────────────────────────────────────────────

    /// Handle a keyboard event. Returns `true` if a shortcut matched.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        self.session.handle_key(key, ctrl, shift, alt, meta)
    }

    /// Arm a placement tool by type tag; empty or `"none"` disarms.
    pub fn set_tool(&mut self, name: &str) -> bool {
        if name.is_empty() || name == "none" {
            self.session.cancel_tool();
            return true;
        }
        match name.parse::<ObjectType>() {
            Ok(tool) => self.session.arm_tool(tool),
            Err(e) => {
                report(&e.to_string());
                false
            }
        }
    }

    pub fn get_tool_name(&self) -> String {
        self.session
            .active_tool()
            .map(|t| t.as_str().to_string())
            .unwrap_or_default()
    }

    /// `"idle"`, `"tool_armed"` or `"dragging"`.
    pub fn get_phase(&self) -> String {
        match self.session.phase() {
            InteractionPhase::Idle => "idle",
            InteractionPhase::ToolArmed => "tool_armed",
            InteractionPhase::Dragging => "dragging",
        }
        .to_string()
    }

    /// Get the selected object id, or empty string.
    pub fn get_selected_id(&self) -> String {
        self.session
            .selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn delete_selected(&mut self) -> bool {
        self.session.delete_selected()
    }

    pub fn clear_objects(&mut self) -> bool {
        self.session.clear_objects()
    }

    // ─── View ────────────────────────────────────────────────────────────

    pub fn get_zoom(&self) -> f32 {
        self.session.zoom()
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.session.set_zoom(zoom);
    }

    pub fn zoom_in(&mut self) {
        self.session.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.session.zoom_out();
    }

    pub fn reset_zoom(&mut self) {
        self.session.reset_zoom();
    }

    pub fn set_segment(&mut self, segment: &str) {
        self.session.set_segment(segment);
    }

    pub fn set_min_score(&mut self, min_score: u8) {
        self.session.set_min_score(min_score);
    }

    pub fn set_theme(&mut self, is_dark: bool) {
        self.session.set_theme(if is_dark { SvgTheme::dark() } else { SvgTheme::light() });
    }

    /// Resize the unzoomed surface.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.session.set_viewport(Viewport {
            width: width as f32,
            height: height as f32,
        });
    }

    // ─── Views & export ──────────────────────────────────────────────────

    pub fn get_objects_json(&self) -> String {
        serde_json::to_string(self.session.objects()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Restore canvas objects saved by the shell. Returns `false` on a
    /// malformed payload.
    pub fn load_objects_json(&mut self, json: &str) -> bool {
        match serde_json::from_str::<Vec<CustomObject>>(json) {
            Ok(objects) => {
                self.session.load_objects(objects);
                true
            }
            Err(e) => {
                report(&format!("invalid objects JSON: {e}"));
                false
            }
        }
    }

    pub fn get_zones_json(&self) -> String {
        let zones = self.session.partition().zones();
        serde_json::to_string(zones.as_slice()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn get_layout_json(&self) -> String {
        serde_json::to_string(&self.session.resolved_layout()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Current surface for on-screen display.
    pub fn render_svg(&self) -> String {
        self.session.render_svg()
    }

    /// Surface for export. Empty string when capture failed; the failure
    /// goes to the console and editing carries on.
    pub fn capture_svg(&self) -> String {
        match self.session.capture_svg() {
            Ok(svg) => svg,
            Err(e) => {
                report(&e.to_string());
                String::new()
            }
        }
    }
}

fn parse_forced(tag: &str) -> seat_core::SeatResult<Option<LayoutFormat>> {
    if tag.is_empty() {
        Ok(None)
    } else {
        tag.parse().map(Some)
    }
}

fn to_js(err: seat_core::SeatError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn report(msg: &str) {
    log::error!("{msg}");
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&msg.into());
}

/// Set up a panic hook that logs to console.error.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Seat WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no canvas needed) ─────────────────────────────

#[derive(Serialize)]
struct FormatInfo {
    tag: &'static str,
    label: &'static str,
}

/// All formats for the picker. Returns JSON: `[{"tag":"teatro","label":"Teatro"}, ...]`.
#[wasm_bindgen]
pub fn list_formats() -> String {
    let formats: Vec<FormatInfo> = LayoutFormat::ALL
        .iter()
        .map(|f| FormatInfo {
            tag: f.as_str(),
            label: f.label(),
        })
        .collect();
    serde_json::to_string(&formats).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RESULT: &str = r#"{
        "participants": [
            { "id": "a", "name": "Ana Souza", "segment": "tech", "score": 90 },
            { "id": "b", "name": "Bruno Lima", "segment": "retail", "score": 40 }
        ],
        "suggestedLayout": "custom"
    }"#;

    fn canvas() -> SeatCanvas {
        SeatCanvas::new(RESULT, 800.0, 600.0, "", false).unwrap()
    }

    #[test]
    fn forced_tag_parsing() {
        assert_eq!(parse_forced("").unwrap(), None);
        assert_eq!(parse_forced("mesa_t").unwrap(), Some(LayoutFormat::MesaT));
        assert!(parse_forced("round").is_err());
    }

    #[test]
    fn click_reports_placement() {
        let mut c = canvas();
        assert!(c.set_tool("seat"));
        assert_eq!(c.get_phase(), "tool_armed");
        let reply: serde_json::Value = serde_json::from_str(&c.handle_click(400.0, 300.0)).unwrap();
        assert_eq!(reply["placement"], "created");
        assert_eq!(reply["changed"], true);
        assert_eq!(c.get_selected_id(), reply["id"].as_str().unwrap());

        let objects: serde_json::Value = serde_json::from_str(&c.get_objects_json()).unwrap();
        assert_eq!(objects[0]["type"], "seat");
        assert_eq!(objects[0]["participantIndex"], 0);
        assert_eq!(objects[0]["x"], 50.0);
    }

    #[test]
    fn objects_json_restores() {
        let mut c = canvas();
        c.set_tool("plant");
        c.handle_click(100.0, 100.0);
        let saved = c.get_objects_json();

        let mut other = canvas();
        assert!(other.load_objects_json(&saved));
        assert_eq!(other.get_objects_json(), saved);
        assert!(!other.load_objects_json("{"));
    }

    #[test]
    fn formats_are_listed_in_picker_order() {
        let list: serde_json::Value = serde_json::from_str(&list_formats()).unwrap();
        assert_eq!(list.as_array().unwrap().len(), 9);
        assert_eq!(list[0]["tag"], "teatro");
    }
}
