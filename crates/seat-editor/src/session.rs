//! Layout session: one seating surface with its hosting-shell contract.
//!
//! Composes the directory, roster, chosen format, canvas objects,
//! interaction state and view state. Hosts (the browser bridge, the CLI)
//! drive it with pointer events, key events and setters, and read back
//! the resolved layout or the captured SVG surface.
//!
//! Two sessions never share object state; a preview and an editor each
//! hold their own.

use crate::canvas::{CanvasModel, ObjectMutation};
use crate::input::InputEvent;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::{EventContext, Interaction, InteractionPhase, Placement};
use seat_core::error::{SeatError, SeatResult};
use seat_core::id::ObjectId;
use seat_core::layout::{ResolvedLayout, Viewport, resolve_custom, resolve_layout};
use seat_core::model::{
    CustomObject, Directory, LayoutFormat, LinearRoster, ObjectType, Participant, ScoringResult,
    clamp_percent,
};
use seat_core::partition::{self, Partition};
use seat_core::preference::{KeyValueStore, LayoutPreference};
use seat_core::view::ViewState;
use seat_render::hit::hit_test;
use seat_render::svg::{SeatBadge, SvgOptions, SvgTheme, render_svg};

/// Host-supplied settings.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Overrides the stored preference and locks the format.
    pub forced_format: Option<LayoutFormat>,
    /// Pure rendering surface: no editing, no filter.
    pub read_only: bool,
    /// Unzoomed surface size in pixels.
    pub viewport: Viewport,
}

/// Called with the new format whenever the active format changes.
pub type FormatListener = Box<dyn FnMut(LayoutFormat)>;

/// What a pointer event did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventResult {
    /// The object set changed.
    pub changed: bool,
    pub placement: Option<Placement>,
}

pub struct LayoutSession<S> {
    directory: Directory,
    roster: LinearRoster,
    suggested: LayoutFormat,
    forced: Option<LayoutFormat>,
    format: LayoutFormat,
    preference: LayoutPreference<S>,
    canvas: CanvasModel,
    interaction: Interaction,
    view: ViewState,
    viewport: Viewport,
    theme: SvgTheme,
    on_format_change: Option<FormatListener>,
}

impl<S: KeyValueStore> LayoutSession<S> {
    pub fn new(result: ScoringResult, store: S, options: SessionOptions) -> Self {
        let directory = Directory::new(result.participants);
        let roster = LinearRoster::from_groups(&directory, &result.seating_groups);
        let preference = LayoutPreference::new(store);
        let format = preference.load(options.forced_format, result.suggested_layout);
        log::info!(
            "layout session: {} participants, {} seated, format {format}",
            directory.len(),
            roster.len()
        );
        Self {
            directory,
            roster,
            suggested: result.suggested_layout,
            forced: options.forced_format,
            format,
            preference,
            canvas: CanvasModel::new(),
            interaction: Interaction::new(options.read_only),
            view: ViewState::default(),
            viewport: options.viewport,
            theme: SvgTheme::default(),
            on_format_change: None,
        }
    }

    // ─── Format ──────────────────────────────────────────────────────────

    pub fn format(&self) -> LayoutFormat {
        self.format
    }

    pub fn suggested_format(&self) -> LayoutFormat {
        self.suggested
    }

    /// `true` while the host forces a format; the picker is disabled.
    pub fn is_format_locked(&self) -> bool {
        self.forced.is_some()
    }

    pub fn set_on_format_change(&mut self, listener: impl FnMut(LayoutFormat) + 'static) {
        self.on_format_change = Some(Box::new(listener));
    }

    /// Operator format change. Notifies the host and persists the choice.
    ///
    /// Returns `Ok(false)` when nothing changed, including while the format
    /// is locked. A failed write keeps the new format active.
    pub fn set_format(&mut self, format: LayoutFormat) -> SeatResult<bool> {
        if let Some(forced) = self.forced {
            log::debug!("format locked to {forced}, ignoring {format}");
            return Ok(false);
        }
        if format == self.format {
            return Ok(false);
        }
        self.interaction.reset_gesture();
        self.format = format;
        log::debug!("format -> {format}");
        if let Some(listener) = self.on_format_change.as_mut() {
            listener(format);
        }
        self.preference.save(format)?;
        Ok(true)
    }

    /// Explicitly persist the active format.
    pub fn save_preference(&mut self) -> SeatResult<()> {
        self.preference.save(self.format)
    }

    pub fn preference(&self) -> &LayoutPreference<S> {
        &self.preference
    }

    // ─── Roster & layout ─────────────────────────────────────────────────

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn roster(&self) -> &LinearRoster {
        &self.roster
    }

    /// Participant seated at roster slot `slot`.
    pub fn participant(&self, slot: usize) -> Option<&Participant> {
        self.roster.participant(&self.directory, slot)
    }

    pub fn partition(&self) -> Partition {
        partition::partition(self.format, &self.roster, self.viewport.width)
    }

    pub fn resolved_layout(&self) -> ResolvedLayout {
        match self.format {
            LayoutFormat::Custom => resolve_custom(self.canvas.objects(), self.roster.len()),
            _ => resolve_layout(&self.partition()),
        }
    }

    // ─── Canvas objects ──────────────────────────────────────────────────

    pub fn objects(&self) -> &[CustomObject] {
        self.canvas.objects()
    }

    /// Replace the object set, e.g. with objects restored by the host.
    pub fn load_objects(&mut self, objects: Vec<CustomObject>) {
        self.interaction.reset_gesture();
        self.interaction.deselect();
        self.canvas = CanvasModel::from_objects(objects);
    }

    pub fn phase(&self) -> InteractionPhase {
        self.interaction.phase()
    }

    pub fn active_tool(&self) -> Option<ObjectType> {
        self.interaction.active_tool
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.interaction.selected
    }

    pub fn read_only(&self) -> bool {
        self.interaction.read_only()
    }

    fn editable(&self) -> bool {
        self.format == LayoutFormat::Custom && !self.read_only()
    }

    /// Arm a placement tool. Only the custom format places objects.
    pub fn arm_tool(&mut self, tool: ObjectType) -> bool {
        self.editable() && self.interaction.arm(tool)
    }

    pub fn cancel_tool(&mut self) {
        self.interaction.cancel();
    }

    /// Remove the selected object. Outside the custom format the
    /// selection is kept but ignored until the operator switches back.
    pub fn delete_selected(&mut self) -> bool {
        if !self.editable() {
            return false;
        }
        match self.interaction.delete_selected() {
            Some(m) => self.canvas.apply(m),
            None => false,
        }
    }

    /// Remove every object in one step.
    pub fn clear_objects(&mut self) -> bool {
        if !self.editable() {
            return false;
        }
        match self.interaction.clear() {
            Some(m) => self.canvas.apply(m),
            None => false,
        }
    }

    /// Feed one pointer event. Positions are pixels relative to the
    /// displayed (zoomed) canvas box.
    pub fn handle_event(&mut self, event: &InputEvent) -> EventResult {
        if !self.editable() {
            return EventResult::default();
        }
        let displayed = self.displayed_viewport();
        let zoom = self.view.zoom();
        let roster_len = self.roster.len();
        let hit = event.position().and_then(|(px, py)| {
            hit_test(self.canvas.objects(), roster_len, displayed, zoom, px, py)
        });
        let position = event.position().map(|(px, py)| {
            let (x, y) = displayed.normalize(px, py);
            (clamp_percent(x), clamp_percent(y))
        });

        let outcome = self.interaction.handle(
            event,
            &EventContext {
                hit,
                position,
                canvas: &self.canvas,
                roster_len,
            },
        );
        let changed = self.canvas.apply_all(outcome.mutations);
        // Drop a selection whose object never landed.
        if let Some(id) = self.interaction.selected
            && !self.canvas.contains(id)
        {
            self.interaction.deselect();
        }
        EventResult {
            changed,
            placement: outcome.placement,
        }
    }

    /// Feed a key event. Returns `true` if a shortcut handled it.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        match ShortcutMap::resolve(key, ctrl, shift, alt, meta) {
            Some(action) => {
                self.apply_action(action);
                true
            }
            None => false,
        }
    }

    pub fn apply_action(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::ArmTool(tool) => {
                self.arm_tool(tool);
            }
            ShortcutAction::Cancel => {
                self.interaction.cancel();
                self.interaction.deselect();
            }
            ShortcutAction::Delete => {
                self.delete_selected();
            }
            ShortcutAction::ClearAll => {
                self.clear_objects();
            }
            ShortcutAction::ZoomIn => self.view.zoom_in(),
            ShortcutAction::ZoomOut => self.view.zoom_out(),
            ShortcutAction::ZoomReset => self.view.reset_zoom(),
        }
    }

    /// Move an object to a percent position, as a keyboard nudge or
    /// host-driven edit would.
    pub fn move_object(&mut self, id: ObjectId, x: f32, y: f32) -> bool {
        self.editable() && self.canvas.apply(ObjectMutation::Move { id, x, y })
    }

    // ─── View ────────────────────────────────────────────────────────────

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn zoom(&self) -> f32 {
        self.view.zoom()
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.view.set_zoom(zoom);
    }

    pub fn zoom_in(&mut self) {
        self.view.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.view.zoom_out();
    }

    pub fn reset_zoom(&mut self) {
        self.view.reset_zoom();
    }

    pub fn set_segment(&mut self, segment: impl Into<String>) {
        self.view.set_segment(segment);
    }

    pub fn set_min_score(&mut self, min_score: u8) {
        self.view.set_min_score(min_score);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// The surface as displayed, zoom applied.
    pub fn displayed_viewport(&self) -> Viewport {
        let zoom = self.view.zoom();
        Viewport {
            width: self.viewport.width * zoom,
            height: self.viewport.height * zoom,
        }
    }

    pub fn set_theme(&mut self, theme: SvgTheme) {
        self.theme = theme;
    }

    /// Whether roster slot `slot` renders fully.
    pub fn is_visible(&self, slot: usize) -> bool {
        self.participant(slot)
            .is_none_or(|p| self.view.is_visible(p, self.read_only()))
    }

    /// Seat labels aligned with `layout.seats`.
    pub fn badges(&self, layout: &ResolvedLayout) -> Vec<SeatBadge> {
        layout
            .seats
            .iter()
            .map(|seat| match self.participant(seat.slot) {
                Some(p) => SeatBadge {
                    initials: p.initials(),
                    title: if p.company.is_empty() {
                        p.name.clone()
                    } else {
                        format!("{} · {}", p.name, p.company)
                    },
                    is_host: p.is_host(),
                    score: p.score,
                    visible: self.view.is_visible(p, self.read_only()),
                },
                None => SeatBadge {
                    initials: String::new(),
                    title: String::new(),
                    is_host: false,
                    score: None,
                    visible: true,
                },
            })
            .collect()
    }

    /// The complete surface as SVG, zoom and filter applied.
    pub fn render_svg(&self) -> String {
        let layout = self.resolved_layout();
        let badges = self.badges(&layout);
        render_svg(
            &layout,
            &badges,
            &SvgOptions {
                viewport: self.viewport,
                zoom: self.view.zoom(),
                theme: self.theme.clone(),
                selected: self.interaction.selected,
            },
        )
    }

    /// Capture the surface for export.
    pub fn capture_svg(&self) -> SeatResult<String> {
        if !self.viewport.has_area() {
            return Err(SeatError::capture(format!(
                "viewport {}x{} has no area",
                self.viewport.width, self.viewport.height
            )));
        }
        Ok(self.render_svg())
    }
}
