use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize)]
struct ScriptedPoseFile {
    steps: Vec<ScriptedStep>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ScriptedStep {
    pub duration: f32,
    /// Radians about +Y; positive turns left.
    #[serde(default)]
    pub yaw: f32,
    /// Radians about +X; positive tilts up.
    #[serde(default)]
    pub pitch: f32,
    #[serde(default)]
    pub trigger: bool,
}

/// Controller pose sampled for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControllerPose {
    pub yaw: f32,
    pub pitch: f32,
    pub trigger: bool,
}

/// Replays a timed list of controller poses.
pub struct ScriptedPosePlayer {
    steps: Vec<ScriptedStep>,
    index: usize,
    time_in_step: f32,
    finished: bool,
}

impl ScriptedPosePlayer {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let file: ScriptedPoseFile = serde_json::from_str(&contents)?;
        Self::from_steps(file.steps)
    }

    pub fn from_steps(steps: Vec<ScriptedStep>) -> anyhow::Result<Self> {
        if steps.is_empty() {
            anyhow::bail!("scripted pose file contains no steps");
        }
        Ok(Self {
            steps,
            index: 0,
            time_in_step: 0.0,
            finished: false,
        })
    }

    /// Advance by `dt` and return the pose of the step now active. The last
    /// step is held once the script runs out.
    pub fn advance(&mut self, dt: f32) -> ControllerPose {
        self.time_in_step += dt;
        while self.index < self.steps.len() && self.time_in_step >= self.steps[self.index].duration
        {
            self.time_in_step -= self.steps[self.index].duration;
            if self.index + 1 < self.steps.len() {
                self.index += 1;
            } else {
                self.time_in_step = 0.0;
                self.finished = true;
                break;
            }
        }

        let step = self.steps.get(self.index).cloned().unwrap_or_default();
        ControllerPose {
            yaw: step.yaw,
            pitch: step.pitch,
            trigger: step.trigger && !self.finished,
        }
    }

    /// Whether the last step has run its full duration.
    pub fn finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(duration: f32, yaw: f32, trigger: bool) -> ScriptedStep {
        ScriptedStep {
            duration,
            yaw,
            pitch: 0.0,
            trigger,
        }
    }

    #[test]
    fn steps_play_in_order() {
        let mut player =
            ScriptedPosePlayer::from_steps(vec![step(0.5, 0.1, false), step(0.5, 0.2, true)])
                .unwrap();
        assert_eq!(player.advance(0.25).yaw, 0.1);
        let pose = player.advance(0.5);
        assert_eq!(pose.yaw, 0.2);
        assert!(pose.trigger);
        assert!(!player.finished());
        let pose = player.advance(0.5);
        assert!(player.finished());
        assert_eq!(pose.yaw, 0.2);
        assert!(!pose.trigger, "trigger is released once the script ends");
    }

    #[test]
    fn empty_script_is_rejected() {
        assert!(ScriptedPosePlayer::from_steps(Vec::new()).is_err());
    }

    #[test]
    fn script_file_parses_with_defaults() {
        let path = std::env::temp_dir().join("vrinteract-script-parse.json");
        fs::write(
            &path,
            r#"{"steps":[{"duration":1.0,"trigger":true},{"duration":2.0,"yaw":0.3}]}"#,
        )
        .unwrap();
        let mut player = ScriptedPosePlayer::from_path(&path).unwrap();
        let pose = player.advance(0.0);
        assert_eq!(pose, ControllerPose {
            yaw: 0.0,
            pitch: 0.0,
            trigger: true
        });
        let _ = fs::remove_file(&path);
    }
}
