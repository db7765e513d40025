use crate::config::InterfaceConfig;
use crate::scripted_input::{ControllerPose, ScriptedPosePlayer};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info};
use vrinteract_core::{BoxGeometry, NodeId, Scene, SimTick, Transform, TriangleMesh};
use vrinteract_physics::{Collider, ColliderSet};
use vrinteract_testkit::{aim_at, controller_rotation, EventRecord, JsonlSink, SessionHeader};
use vrinteract_ui3d::{
    CountdownEvent, ElementState, InstructionInterface, InterfaceButton, InterfaceEdit, PanelText,
    TickReport,
};

pub struct HeadlessConfig {
    pub interface: InterfaceConfig,
    /// Pose script; without one the controller aims at Next and presses it
    /// twice a second.
    pub script: Option<PathBuf>,
    pub event_log: Option<PathBuf>,
    /// Overrides `interface.max_ticks`.
    pub max_ticks: Option<u64>,
    pub label: String,
}

/// Outcome of a headless session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub ticks: u64,
    pub clicks: u32,
    /// Page shown when the session stopped.
    pub page: usize,
    /// Every page was read and Next pressed on the last one.
    pub completed: bool,
    /// Ticks on which the controller collider touched the panel.
    pub collision_ticks: u64,
    pub events: usize,
}

enum PoseSource {
    Script(ScriptedPosePlayer),
    AutoNext { period: u64 },
}

impl PoseSource {
    fn pose(
        &mut self,
        tick: SimTick,
        dt: f32,
        scene: &mut Scene,
        controller: NodeId,
        ui: &InstructionInterface,
    ) -> Result<ControllerPose> {
        match self {
            PoseSource::Script(player) => {
                let pose = player.advance(dt);
                scene.set_rotation(controller, controller_rotation(pose.yaw, pose.pitch));
                Ok(pose)
            }
            PoseSource::AutoNext { period } => {
                let target = ui.button(InterfaceButton::Next)?.shape().center;
                aim_at(scene, controller, target);
                Ok(ControllerPose {
                    trigger: tick.0 > 0 && tick.0 % *period == 0,
                    ..ControllerPose::default()
                })
            }
        }
    }

    fn finished(&self) -> bool {
        match self {
            PoseSource::Script(player) => player.finished(),
            PoseSource::AutoNext { .. } => false,
        }
    }
}

struct Recorder {
    sink: Option<JsonlSink>,
    events: usize,
}

impl Recorder {
    fn record(&mut self, record: EventRecord) -> Result<()> {
        debug!(tick = record.tick.0, kind = %record.kind, subject = %record.subject, "event");
        if let Some(sink) = self.sink.as_mut() {
            sink.write(&record)?;
        }
        self.events += 1;
        Ok(())
    }

    fn report(&mut self, tick: SimTick, ui: &InstructionInterface, report: &TickReport) -> Result<()> {
        for (id, state) in &report.transitions {
            let name = ui.element(*id)?.name().to_string();
            self.record(EventRecord::new(tick, "state", name, state.to_string()))?;
        }
        for id in &report.selected {
            let name = ui.element(*id)?.name().to_string();
            self.record(EventRecord::new(tick, "selected", name, ""))?;
        }
        Ok(())
    }
}

pub fn run(cfg: HeadlessConfig) -> Result<SessionSummary> {
    let settings = &cfg.interface;
    if settings.pages.is_empty() {
        anyhow::bail!("interface config has no pages");
    }
    let dt = settings.tick_dt();
    let max_ticks = cfg.max_ticks.unwrap_or(settings.max_ticks);

    let mut source = match cfg.script.as_deref() {
        Some(path) => PoseSource::Script(
            ScriptedPosePlayer::from_path(path)
                .with_context(|| format!("failed to load pose script {}", path.display()))?,
        ),
        None => PoseSource::AutoNext {
            period: ((settings.tick_rate * 0.5).round() as u64).max(2),
        },
    };

    let mut recorder = Recorder {
        sink: match cfg.event_log.as_deref() {
            Some(path) => {
                let mut sink = JsonlSink::create(path)?;
                sink.write(&SessionHeader::now(settings.tick_rate, cfg.label.clone()))?;
                Some(sink)
            }
            None => None,
        },
        events: 0,
    };

    let mut scene = Scene::new();
    let controller = scene.add_node(
        "controller",
        Transform::from_translation(settings.controller_position()),
    );
    let size = settings.collider_size();
    let mut colliders = ColliderSet::new();
    colliders.attach(controller, Collider::new(BoxGeometry::new(size.x, size.y, size.z)));

    let mut ui = InstructionInterface::new(settings.position());
    ui.engine_mut().bind_controller(controller);
    let plane = &settings.selection_plane;
    if plane.enabled {
        ui.create_selection_plane(
            plane.distance,
            plane.color(),
            plane.opacity,
            plane.width,
            plane.height,
        );
        if settings.explicit_on_start {
            ui.start_explicit();
        }
    }

    let mut summary = SessionSummary::default();
    show_page(&mut ui, settings, summary.page)?;

    if settings.countdown_seconds > 0 {
        let seconds = settings.countdown_seconds;
        ui.countdown(seconds, move || info!(seconds, "instructions unlocked"))?;
        recorder.record(EventRecord::new(
            SimTick::ZERO,
            "countdown",
            "emph",
            format!("started {seconds}"),
        ))?;
    }

    info!(
        pages = settings.pages.len(),
        max_ticks,
        scripted = cfg.script.is_some(),
        "headless session started"
    );

    let mut tick = SimTick::ZERO;
    let mut trigger_held = false;
    let mut colliding = false;
    while tick.0 < max_ticks {
        let pose = source.pose(tick, dt, &mut scene, controller, &ui)?;
        if pose.trigger != trigger_held {
            ui.engine_mut().set_selecting(pose.trigger);
            trigger_held = pose.trigger;
        }

        for event in ui.advance(dt)? {
            let detail = match event {
                CountdownEvent::Tick { remaining } => format!("remaining {remaining}"),
                CountdownEvent::Completed => "completed".to_string(),
                CountdownEvent::Cancelled => "cancelled".to_string(),
            };
            recorder.record(EventRecord::new(tick, "countdown", "emph", detail))?;
        }

        let report = ui.update_ui(&scene);
        recorder.report(tick, &ui, &report)?;

        let panel = panel_mesh(&ui);
        let touching = colliders.test(controller, &scene, &panel)?;
        if touching {
            summary.collision_ticks += 1;
        }
        if touching != colliding {
            colliding = touching;
            recorder.record(EventRecord::new(
                tick,
                "collision",
                "controller",
                if touching { "enter" } else { "exit" },
            ))?;
        }

        tick = tick.advance(1);

        if ui.clicked(InterfaceButton::Read) {
            summary.clicks += 1;
            info!(page = summary.page, "read aloud requested");
        }
        if ui.clicked(InterfaceButton::Emph) {
            summary.clicks += 1;
            info!(page = summary.page, "alert acknowledged");
        }
        if ui.clicked(InterfaceButton::Back) {
            summary.clicks += 1;
            summary.page = summary.page.saturating_sub(1);
            show_page(&mut ui, settings, summary.page)?;
        }
        if ui.clicked(InterfaceButton::Next) {
            summary.clicks += 1;
            if summary.page + 1 >= settings.pages.len() {
                summary.completed = true;
                info!(tick = tick.0, "all pages read");
                break;
            }
            summary.page += 1;
            show_page(&mut ui, settings, summary.page)?;
        }

        if source.finished() {
            debug!(tick = tick.0, "pose script finished");
            break;
        }
    }

    summary.ticks = tick.0;
    summary.events = recorder.events;
    if let Some(sink) = recorder.sink.as_mut() {
        sink.flush()?;
    }
    Ok(summary)
}

fn show_page(ui: &mut InstructionInterface, settings: &InterfaceConfig, page: usize) -> Result<()> {
    let total = settings.pages.len();
    let text = settings.pages.get(page).cloned().unwrap_or_default();
    ui.edit(InterfaceEdit {
        title: Some(PanelText::Show(format!("Instructions {}/{}", page + 1, total))),
        instructions: Some(PanelText::Show(text)),
        back_state: Some(if page == 0 {
            ElementState::Disabled
        } else {
            ElementState::Idle
        }),
        ..Default::default()
    })?;
    ui.update_progress_bar(page as u32 + 1, total as u32);
    debug!(page, total, "page shown");
    Ok(())
}

/// Visible interface quads as one collision target.
fn panel_mesh(ui: &InstructionInterface) -> TriangleMesh {
    TriangleMesh::from_triangles(
        ui.engine()
            .elements()
            .filter(|(_, element)| element.is_visible())
            .flat_map(|(_, element)| {
                let [tl, tr, bl, br] = element.shape().corners();
                [[tl, tr, bl], [tr, br, bl]]
            }),
    )
}
