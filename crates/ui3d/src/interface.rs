//! Instruction interface: title, progress bar, instruction text and four
//! buttons arranged on a floating panel, driven by one controller.

use glam::{Mat4, Vec3};
use tracing::{debug, info, warn};
use vrinteract_core::SceneGraph;

use crate::components::{
    Button, ButtonStyle, Color, ElementId, ElementState, InteractiveElement, Panel,
};
use crate::countdown::{CountdownEvent, CountdownGate};
use crate::error::InterfaceError;
use crate::interaction::{InteractionEngine, SelectionQuad, TickReport};
use crate::layout::{arrange, Direction, LayoutNode};

/// Default label of the next button.
pub const NEXT_TEXT: &str = "Next";
/// Default label of the emphasis button.
pub const EMPH_TEXT: &str =
    "ALERT, this is not just a break.\n Read instructions and press this button to continue";
/// Next button label while a countdown runs.
pub const COUNTDOWN_NEXT_TEXT: &str = "Listen to instructions!";

const BUTTON_MARGIN: f32 = 0.02;
const DEPTH_STEP: f32 = 0.005;
const PROGRESS_WIDTH: f32 = 0.6;
const PROGRESS_HEIGHT: f32 = 0.02;

/// The four buttons of the interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceButton {
    Read,
    Back,
    Next,
    Emph,
}

/// New text for a panel, or hide it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelText {
    Show(String),
    Hide,
}

/// A batch of changes applied by [`InstructionInterface::edit`]. `None`
/// leaves the corresponding part untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceEdit {
    pub title: Option<PanelText>,
    pub instructions: Option<PanelText>,
    pub interactive: Option<bool>,
    /// `Some(false)` hides every button row and disables read, back and next.
    pub buttons: Option<bool>,
    /// `Some(false)` hides the emphasis row and disables its button.
    pub buttons2: Option<bool>,
    pub read_state: Option<ElementState>,
    pub read_text: Option<String>,
    pub back_state: Option<ElementState>,
    pub back_text: Option<String>,
    pub next_state: Option<ElementState>,
    pub next_text: Option<String>,
    pub emph_state: Option<ElementState>,
    pub emph_text: Option<String>,
}

/// Ids of every element the interface registers, in hit-test priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceIds {
    pub read: ElementId,
    pub back: ElementId,
    pub next: ElementId,
    pub emph: ElementId,
    pub title: ElementId,
    pub progress: ElementId,
    pub instructions: ElementId,
    pub button_panel0: ElementId,
    pub button_panel: ElementId,
    pub button_panel2: ElementId,
}

impl InterfaceIds {
    pub fn button(&self, button: InterfaceButton) -> ElementId {
        match button {
            InterfaceButton::Read => self.read,
            InterfaceButton::Back => self.back,
            InterfaceButton::Next => self.next,
            InterfaceButton::Emph => self.emph,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Clicks {
    read: bool,
    back: bool,
    next: bool,
    emph: bool,
}

/// Floating instruction panel and its interaction engine.
#[derive(Debug)]
pub struct InstructionInterface {
    position: Vec3,
    engine: InteractionEngine,
    ids: InterfaceIds,
    progress_fill: InteractiveElement,
    countdown: CountdownGate,
    clicks: Clicks,
}

impl Default for InstructionInterface {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 1.2, -1.8))
    }
}

impl InstructionInterface {
    /// Build the interface centred on `position`.
    pub fn new(position: Vec3) -> Self {
        let mut engine = InteractionEngine::new();

        let read = engine.add_element(Button::new("Read Aloud").with_width(0.4).build("read"));
        let back = engine.add_element(
            Button::new("Back")
                .with_width(0.3)
                .with_initial_state(ElementState::Disabled)
                .build("back"),
        );
        let next = engine.add_element(Button::new(NEXT_TEXT).with_width(0.7).build("next"));
        let emph = engine.add_element(
            Button::new(EMPH_TEXT)
                .with_width(1.75)
                .with_style(ButtonStyle::Alert)
                .build("emph"),
        );

        let title = engine.add_element(Panel::new(1.2, 0.15).with_text("Instructions").build("title"));
        let progress = engine.add_element(
            Panel::new(PROGRESS_WIDTH, PROGRESS_HEIGHT)
                .with_margin(0.01)
                .build("progress"),
        );
        let instructions = engine.add_element(
            Panel::new(2.5, 0.8)
                .with_margin(0.03)
                .with_padding(0.04)
                .with_text("")
                .build("instructions"),
        );
        let button_panel0 =
            engine.add_element(Panel::new(0.5, 0.2).with_padding(0.05).build("button_panel0"));
        let button_panel =
            engine.add_element(Panel::new(1.2, 0.25).with_padding(0.05).build("button_panel"));
        let button_panel2 =
            engine.add_element(Panel::new(2.0, 0.25).with_padding(0.05).build("button_panel2"));

        let ids = InterfaceIds {
            read,
            back,
            next,
            emph,
            title,
            progress,
            instructions,
            button_panel0,
            button_panel,
            button_panel2,
        };

        let mut interface = Self {
            position,
            engine,
            ids,
            progress_fill: Panel::new(0.001, PROGRESS_HEIGHT)
                .with_background(Color::GREEN, 1.0)
                .build("progress_fill"),
            countdown: CountdownGate::new(),
            clicks: Clicks::default(),
        };
        interface.apply_layout();
        interface.place_progress_fill();
        info!(%position, "instruction interface ready");
        interface
    }

    fn layout(&self) -> LayoutNode {
        let ids = &self.ids;
        let button = |id: ElementId, width: f32| {
            LayoutNode::block(Some(id), width, 0.15).with_margin(BUTTON_MARGIN)
        };
        LayoutNode::container(Direction::Column)
            .with_child(LayoutNode::block(Some(ids.title), 1.2, 0.15))
            .with_child(
                LayoutNode::block(Some(ids.progress), PROGRESS_WIDTH, PROGRESS_HEIGHT)
                    .with_margin(0.01),
            )
            .with_child(
                LayoutNode::block(Some(ids.button_panel0), 0.5, 0.2)
                    .with_direction(Direction::Row)
                    .with_child(button(ids.read, 0.4)),
            )
            .with_child(LayoutNode::block(Some(ids.instructions), 2.5, 0.8).with_margin(0.03))
            .with_child(
                LayoutNode::block(Some(ids.button_panel), 1.2, 0.25)
                    .with_direction(Direction::Row)
                    .with_child(button(ids.back, 0.3))
                    .with_child(button(ids.next, 0.7)),
            )
            .with_child(
                LayoutNode::block(Some(ids.button_panel2), 2.0, 0.25)
                    .with_direction(Direction::Row)
                    .with_child(button(ids.emph, 1.75)),
            )
    }

    fn apply_layout(&mut self) {
        for (id, center) in arrange(&self.layout(), self.position, DEPTH_STEP) {
            if let Some(element) = self.engine.element_mut(id) {
                element.set_center(center);
            }
        }
    }

    /// Move the whole panel.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.apply_layout();
        self.place_progress_fill();
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn ids(&self) -> &InterfaceIds {
        &self.ids
    }

    pub fn engine(&self) -> &InteractionEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut InteractionEngine {
        &mut self.engine
    }

    /// Element registered under `id`.
    pub fn element(&self, id: ElementId) -> Result<&InteractiveElement, InterfaceError> {
        self.engine
            .element(id)
            .ok_or(InterfaceError::UnknownElement(id))
    }

    fn element_mut(&mut self, id: ElementId) -> Result<&mut InteractiveElement, InterfaceError> {
        self.engine
            .element_mut(id)
            .ok_or(InterfaceError::UnknownElement(id))
    }

    pub fn button(&self, button: InterfaceButton) -> Result<&InteractiveElement, InterfaceError> {
        self.element(self.ids.button(button))
    }

    /// Whether `button` entered `Selected` during the last update.
    pub fn clicked(&self, button: InterfaceButton) -> bool {
        match button {
            InterfaceButton::Read => self.clicks.read,
            InterfaceButton::Back => self.clicks.back,
            InterfaceButton::Next => self.clicks.next,
            InterfaceButton::Emph => self.clicks.emph,
        }
    }

    /// Apply a batch of content, visibility and state changes.
    pub fn edit(&mut self, edit: InterfaceEdit) -> Result<(), InterfaceError> {
        let ids = self.ids;
        match edit.title {
            Some(PanelText::Show(text)) => {
                let title = self.element_mut(ids.title)?;
                title.set_visible(true);
                title.set_text(text);
            }
            Some(PanelText::Hide) => self.element_mut(ids.title)?.set_visible(false),
            None => {}
        }
        match edit.instructions {
            Some(PanelText::Show(text)) => {
                let panel = self.element_mut(ids.instructions)?;
                panel.set_visible(true);
                panel.set_text(text);
            }
            Some(PanelText::Hide) => self.element_mut(ids.instructions)?.set_visible(false),
            None => {}
        }

        if let Some(interactive) = edit.interactive {
            self.set_interactive(interactive);
        }

        if edit.buttons == Some(false) {
            self.element_mut(ids.title)?.set_visible(false);
            self.element_mut(ids.progress)?.set_visible(false);
            self.set_row_visible(ids.button_panel0, false)?;
            self.set_row_visible(ids.button_panel, false)?;
            self.set_row_visible(ids.button_panel2, false)?;
            for id in [ids.back, ids.next, ids.read] {
                self.element_mut(id)?.set_state(ElementState::Disabled);
            }
        } else {
            self.edit_button(ids.back, ids.button_panel, edit.back_state, edit.back_text)?;
            self.edit_button(ids.next, ids.button_panel, edit.next_state, edit.next_text)?;
            // Read reveals its own row, not the back/next row; read is laid out in button_panel0.
            self.edit_button(ids.read, ids.button_panel0, edit.read_state, edit.read_text)?;
        }

        if edit.buttons2 == Some(false) {
            self.set_row_visible(ids.button_panel2, false)?;
            self.element_mut(ids.emph)?.set_state(ElementState::Disabled);
        } else {
            self.edit_button(ids.emph, ids.button_panel2, edit.emph_state, edit.emph_text)?;
        }
        Ok(())
    }

    fn edit_button(
        &mut self,
        button: ElementId,
        row: ElementId,
        state: Option<ElementState>,
        text: Option<String>,
    ) -> Result<(), InterfaceError> {
        if state.is_none() && text.is_none() {
            return Ok(());
        }
        self.set_row_visible(row, true)?;
        let element = self.element_mut(button)?;
        if let Some(state) = state {
            element.set_state(state);
        }
        if let Some(text) = text {
            element.set_text(text);
        }
        Ok(())
    }

    /// Show or hide a button row together with the buttons it holds.
    fn set_row_visible(&mut self, row: ElementId, visible: bool) -> Result<(), InterfaceError> {
        let ids = self.ids;
        let members = if row == ids.button_panel0 {
            vec![ids.read]
        } else if row == ids.button_panel {
            vec![ids.back, ids.next]
        } else if row == ids.button_panel2 {
            vec![ids.emph]
        } else {
            Vec::new()
        };
        self.element_mut(row)?.set_visible(visible);
        for member in members {
            self.element_mut(member)?.set_visible(visible);
        }
        Ok(())
    }

    /// Fill the progress bar to `numerator / denominator` of its width.
    pub fn update_progress_bar(&mut self, numerator: u32, denominator: u32) {
        let width = if denominator == 0 {
            0.0
        } else {
            PROGRESS_WIDTH * numerator as f32 / denominator as f32
        };
        self.progress_fill.set_size(width, PROGRESS_HEIGHT);
        self.place_progress_fill();
    }

    fn place_progress_fill(&mut self) {
        let Some(bar) = self.engine.element(self.ids.progress) else {
            return;
        };
        let bar = *bar.shape();
        let width = self.progress_fill.shape().size.x;
        let left = bar.center.x - bar.size.x * 0.5;
        self.progress_fill
            .set_center(Vec3::new(left + width * 0.5, bar.center.y, bar.center.z + DEPTH_STEP));
    }

    /// Green inner block of the progress bar.
    pub fn progress_fill(&self) -> &InteractiveElement {
        &self.progress_fill
    }

    /// Run one pointer update and record which buttons were clicked.
    ///
    /// A click releases the trigger so holding it does not select again.
    pub fn update_ui<S>(&mut self, scene: &S) -> TickReport
    where
        S: SceneGraph + ?Sized,
    {
        let report = self.engine.update(scene);
        if !report.ran {
            return report;
        }
        self.clicks = Clicks::default();
        for &id in &report.selected {
            let ids = &self.ids;
            if id == ids.next {
                self.clicks.next = true;
            } else if id == ids.back {
                self.clicks.back = true;
            } else if id == ids.read {
                self.clicks.read = true;
            } else if id == ids.emph {
                self.clicks.emph = true;
            } else {
                continue;
            }
            debug!(%id, "button clicked");
            self.engine.set_selecting(false);
        }
        report
    }

    /// Turn pointer interaction on or off. Pending clicks are cleared.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.engine.set_interactive(interactive);
        self.clicks = Clicks::default();
    }

    pub fn is_interactive(&self) -> bool {
        self.engine.is_interactive()
    }

    /// Lock the interface for `duration` seconds, showing the time left on
    /// the emphasis button, then run `on_complete`.
    pub fn countdown(
        &mut self,
        duration: u32,
        on_complete: impl FnOnce() + 'static,
    ) -> Result<(), InterfaceError> {
        let event = self.countdown.start(&mut self.engine, duration, on_complete)?;
        self.clicks = Clicks::default();
        self.show_countdown(event)
    }

    /// Feed simulated time to a running countdown.
    pub fn advance(&mut self, dt: f32) -> Result<Vec<CountdownEvent>, InterfaceError> {
        let events = self.countdown.advance(&mut self.engine, dt);
        for &event in &events {
            self.show_countdown(event)?;
        }
        Ok(events)
    }

    /// Stop a running countdown without running its callback.
    pub fn cancel_countdown(&mut self) -> Result<Option<CountdownEvent>, InterfaceError> {
        let event = self.countdown.cancel(&mut self.engine);
        if let Some(event) = event {
            self.show_countdown(event)?;
        }
        Ok(event)
    }

    pub fn countdown_gate(&self) -> &CountdownGate {
        &self.countdown
    }

    fn show_countdown(&mut self, event: CountdownEvent) -> Result<(), InterfaceError> {
        let ids = self.ids;
        match event {
            CountdownEvent::Tick { remaining } => {
                self.element_mut(ids.next)?.set_text(COUNTDOWN_NEXT_TEXT);
                self.element_mut(ids.emph)?
                    .set_text(format!("Read instructions! {remaining}"));
            }
            CountdownEvent::Completed | CountdownEvent::Cancelled => {
                self.element_mut(ids.next)?.set_text(NEXT_TEXT);
                self.element_mut(ids.emph)?.set_text(EMPH_TEXT);
                self.set_interactive(true);
            }
        }
        Ok(())
    }

    /// Create the selection plane `distance` metres down -Z from the world
    /// origin. It starts hidden.
    pub fn create_selection_plane(
        &mut self,
        distance: f32,
        color: Color,
        opacity: f32,
        width: f32,
        height: f32,
    ) {
        self.engine.create_selection_plane(
            SelectionQuad::new(distance, color, opacity, width, height),
            Mat4::IDENTITY,
        );
    }

    /// Move the selection quad. Call [`Self::refresh_selection_plane`] to
    /// make the pointer follow it.
    pub fn update_selection_plane(&mut self, distance: f32) -> Result<(), InterfaceError> {
        self.selection_plane_mut()?.set_distance(distance);
        Ok(())
    }

    /// Recompute the plane from the quad's current corners.
    pub fn refresh_selection_plane(&mut self) -> Result<(), InterfaceError> {
        self.selection_plane_mut()?.refresh();
        Ok(())
    }

    fn selection_plane_mut(
        &mut self,
    ) -> Result<&mut crate::interaction::SelectionPlane, InterfaceError> {
        self.engine.selection_plane_mut().ok_or_else(|| {
            warn!("selection plane used before it was created");
            InterfaceError::NoSelectionPlane
        })
    }

    pub fn start_explicit(&mut self) {
        self.engine.start_explicit();
    }

    pub fn stop_explicit(&mut self) {
        self.engine.stop_explicit();
    }

    /// Colour of the plane-locked dot.
    pub fn set_dot_sel_color(&mut self, color: Color) {
        self.engine.pointer_mut().dot_sel.color = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_states() {
        let ui = InstructionInterface::default();
        let state = |b| ui.button(b).unwrap().current_state();
        assert_eq!(state(InterfaceButton::Back), Some(ElementState::Disabled));
        assert_eq!(state(InterfaceButton::Next), Some(ElementState::Idle));
        assert_eq!(state(InterfaceButton::Read), Some(ElementState::Idle));
        assert_eq!(state(InterfaceButton::Emph), Some(ElementState::Idle));
        assert_eq!(ui.element(ui.ids().title).unwrap().text(), Some("Instructions"));
        assert_eq!(ui.engine().elements().count(), 10);
    }

    #[test]
    fn test_priority_order() {
        let ui = InstructionInterface::default();
        let ids = ui.ids();
        let order = [
            ids.read,
            ids.back,
            ids.next,
            ids.emph,
            ids.title,
            ids.progress,
            ids.instructions,
            ids.button_panel0,
            ids.button_panel,
            ids.button_panel2,
        ];
        for (expected, id) in order.iter().enumerate() {
            assert_eq!(id.0 as usize, expected);
        }
    }

    #[test]
    fn test_layout_stacks_rows() {
        let ui = InstructionInterface::default();
        let center = |id| ui.element(id).unwrap().shape().center;
        let ids = *ui.ids();
        assert!(center(ids.title).y > center(ids.progress).y);
        assert!(center(ids.progress).y > center(ids.button_panel0).y);
        assert!(center(ids.button_panel0).y > center(ids.instructions).y);
        assert!(center(ids.instructions).y > center(ids.button_panel).y);
        assert!(center(ids.button_panel).y > center(ids.button_panel2).y);
        assert!(center(ids.back).x < center(ids.next).x);
        assert!((center(ids.next).y - center(ids.button_panel).y).abs() < 1e-6);
        assert!(center(ids.next).z > center(ids.button_panel).z);
    }

    #[test]
    fn test_hiding_buttons_disables_them() {
        let mut ui = InstructionInterface::default();
        ui.edit(InterfaceEdit {
            buttons: Some(false),
            ..Default::default()
        })
        .unwrap();
        let ids = *ui.ids();
        for button in [InterfaceButton::Read, InterfaceButton::Back, InterfaceButton::Next] {
            let element = ui.button(button).unwrap();
            assert_eq!(element.current_state(), Some(ElementState::Disabled));
            assert!(!element.is_visible());
        }
        assert!(!ui.element(ids.title).unwrap().is_visible());
        assert!(!ui.element(ids.progress).unwrap().is_visible());
        // Emphasis row is hidden but its state is left alone.
        assert!(!ui.element(ids.button_panel2).unwrap().is_visible());
        assert_eq!(
            ui.button(InterfaceButton::Emph).unwrap().current_state(),
            Some(ElementState::Idle)
        );
    }

    #[test]
    fn test_button_edits_reveal_their_row() {
        let mut ui = InstructionInterface::default();
        ui.edit(InterfaceEdit {
            buttons: Some(false),
            ..Default::default()
        })
        .unwrap();
        ui.edit(InterfaceEdit {
            next_state: Some(ElementState::Idle),
            next_text: Some("Continue".into()),
            ..Default::default()
        })
        .unwrap();
        let ids = *ui.ids();
        assert!(ui.element(ids.button_panel).unwrap().is_visible());
        assert!(!ui.element(ids.button_panel0).unwrap().is_visible());
        let next = ui.button(InterfaceButton::Next).unwrap();
        assert_eq!(next.text(), Some("Continue"));
        assert_eq!(next.current_state(), Some(ElementState::Idle));
    }

    #[test]
    fn test_read_edit_reveals_only_its_own_row() {
        let mut ui = InstructionInterface::default();
        ui.edit(InterfaceEdit {
            buttons: Some(false),
            ..Default::default()
        })
        .unwrap();
        ui.edit(InterfaceEdit {
            read_state: Some(ElementState::Idle),
            ..Default::default()
        })
        .unwrap();
        let ids = *ui.ids();
        assert!(ui.element(ids.button_panel0).unwrap().is_visible());
        assert!(ui.button(InterfaceButton::Read).unwrap().is_visible());
        assert!(!ui.element(ids.button_panel).unwrap().is_visible());
        assert!(!ui.button(InterfaceButton::Next).unwrap().is_visible());
    }

    #[test]
    fn test_panel_text_edits() {
        let mut ui = InstructionInterface::default();
        ui.edit(InterfaceEdit {
            title: Some(PanelText::Show("Block 2".into())),
            instructions: Some(PanelText::Hide),
            buttons2: Some(false),
            ..Default::default()
        })
        .unwrap();
        let ids = *ui.ids();
        assert_eq!(ui.element(ids.title).unwrap().text(), Some("Block 2"));
        assert!(!ui.element(ids.instructions).unwrap().is_visible());
        assert_eq!(
            ui.button(InterfaceButton::Emph).unwrap().current_state(),
            Some(ElementState::Disabled)
        );
    }

    #[test]
    fn test_progress_bar_width() {
        let mut ui = InstructionInterface::default();
        ui.update_progress_bar(1, 4);
        assert!((ui.progress_fill().shape().size.x - 0.15).abs() < 1e-6);
        ui.update_progress_bar(3, 0);
        assert_eq!(ui.progress_fill().shape().size.x, 0.0);
        ui.update_progress_bar(2, 2);
        let bar = ui.element(ui.ids().progress).unwrap().shape().center;
        assert!((ui.progress_fill().shape().center.x - bar.x).abs() < 1e-6);
    }

    #[test]
    fn test_countdown_texts() {
        let mut ui = InstructionInterface::default();
        ui.countdown(2, || {}).unwrap();
        assert!(!ui.is_interactive());
        assert_eq!(
            ui.button(InterfaceButton::Next).unwrap().text(),
            Some(COUNTDOWN_NEXT_TEXT)
        );
        assert_eq!(
            ui.button(InterfaceButton::Emph).unwrap().text(),
            Some("Read instructions! 2")
        );

        ui.advance(1.0).unwrap();
        assert_eq!(
            ui.button(InterfaceButton::Emph).unwrap().text(),
            Some("Read instructions! 1")
        );
        assert_eq!(
            ui.countdown(5, || {}),
            Err(InterfaceError::CountdownAlreadyRunning)
        );

        ui.advance(1.0).unwrap();
        assert!(ui.is_interactive());
        assert_eq!(ui.button(InterfaceButton::Next).unwrap().text(), Some(NEXT_TEXT));
        assert_eq!(ui.button(InterfaceButton::Emph).unwrap().text(), Some(EMPH_TEXT));
    }

    #[test]
    fn test_selection_plane_requires_creation() {
        let mut ui = InstructionInterface::default();
        assert_eq!(
            ui.refresh_selection_plane(),
            Err(InterfaceError::NoSelectionPlane)
        );
        ui.create_selection_plane(2.0, Color::WHITE, 0.3, 0.5, 0.5);
        assert!(ui.update_selection_plane(3.0).is_ok());
        assert!(ui.refresh_selection_plane().is_ok());
        ui.set_dot_sel_color(Color::GREEN);
        assert_eq!(ui.engine().pointer().dot_sel.color, Color::GREEN);
    }

    #[test]
    fn test_unknown_element() {
        let ui = InstructionInterface::default();
        assert_eq!(
            ui.element(ElementId(99)).unwrap_err(),
            InterfaceError::UnknownElement(ElementId(99))
        );
    }
}
