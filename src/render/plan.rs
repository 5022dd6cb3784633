use crate::binding::BindingFrequency;
use crate::pipeline::PipelineKind;

/// One object to draw: the pipeline it goes through, and indices into the
/// host's material and object tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawItem {
    pub pipeline: PipelineKind,
    pub material: usize,
    pub object: usize,
}

/// A state change or draw in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindCommand {
    SetPipeline(PipelineKind),
    BindFrame(PipelineKind),
    BindObject(usize),
    BindMaterial(usize),
    Draw(usize),
}

impl BindCommand {
    /// Bind group index the command sets, if it sets one.
    pub fn group(&self) -> Option<u32> {
        match self {
            BindCommand::BindFrame(_) => Some(BindingFrequency::Frame.group()),
            BindCommand::BindObject(_) => Some(BindingFrequency::Object.group()),
            BindCommand::BindMaterial(_) => Some(BindingFrequency::Material.group()),
            BindCommand::SetPipeline(_) | BindCommand::Draw(_) => None,
        }
    }
}

/// Orders draws by pipeline, then material, and emits the minimal bind
/// sequence: the frame group once per pipeline switch, the object group per
/// draw, the material group only when the material changes.
pub fn plan_draws(items: &[DrawItem]) -> Vec<BindCommand> {
    let mut ordered = items.to_vec();
    ordered.sort_by_key(|item| (item.pipeline, item.material));

    let mut commands = Vec::with_capacity(ordered.len() * 3);
    let mut current_pipeline = None;
    let mut current_material = None;
    for item in ordered {
        if current_pipeline != Some(item.pipeline) {
            commands.push(BindCommand::SetPipeline(item.pipeline));
            commands.push(BindCommand::BindFrame(item.pipeline));
            current_pipeline = Some(item.pipeline);
            // layouts differ between pipelines
            current_material = None;
        }
        commands.push(BindCommand::BindObject(item.object));
        let has_material_group = item
            .pipeline
            .group_slots(BindingFrequency::Material)
            .next()
            .is_some();
        if has_material_group && current_material != Some(item.material) {
            commands.push(BindCommand::BindMaterial(item.material));
            current_material = Some(item.material);
        }
        commands.push(BindCommand::Draw(item.object));
    }
    commands
}

/// Counters of one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub draws: usize,
    pub pipeline_switches: usize,
    pub frame_binds: usize,
    pub object_binds: usize,
    pub material_binds: usize,
}

impl RenderStats {
    pub fn from_commands(commands: &[BindCommand]) -> Self {
        let mut stats = Self::default();
        for command in commands {
            match command {
                BindCommand::SetPipeline(_) => stats.pipeline_switches += 1,
                BindCommand::BindFrame(_) => stats.frame_binds += 1,
                BindCommand::BindObject(_) => stats.object_binds += 1,
                BindCommand::BindMaterial(_) => stats.material_binds += 1,
                BindCommand::Draw(_) => stats.draws += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(pipeline: PipelineKind, material: usize, object: usize) -> DrawItem {
        DrawItem {
            pipeline,
            material,
            object,
        }
    }

    #[test]
    fn frame_group_is_bound_once_per_pipeline() {
        let items = [
            item(PipelineKind::WorldLitTextured, 0, 0),
            item(PipelineKind::UnlitColored, 1, 1),
            item(PipelineKind::WorldLitTextured, 2, 2),
            item(PipelineKind::UnlitColored, 3, 3),
        ];
        let commands = plan_draws(&items);
        let stats = RenderStats::from_commands(&commands);
        assert_eq!(stats.pipeline_switches, 2);
        assert_eq!(stats.frame_binds, 2);
        assert_eq!(stats.object_binds, 4);
        assert_eq!(stats.draws, 4);
        // unlit-colored has no material group
        assert_eq!(stats.material_binds, 2);
    }

    #[test]
    fn repeated_material_is_not_rebound() {
        let items = [
            item(PipelineKind::CameraLitSpecular, 7, 0),
            item(PipelineKind::CameraLitSpecular, 7, 1),
            item(PipelineKind::CameraLitSpecular, 7, 2),
        ];
        let commands = plan_draws(&items);
        assert_eq!(
            commands,
            vec![
                BindCommand::SetPipeline(PipelineKind::CameraLitSpecular),
                BindCommand::BindFrame(PipelineKind::CameraLitSpecular),
                BindCommand::BindObject(0),
                BindCommand::BindMaterial(7),
                BindCommand::Draw(0),
                BindCommand::BindObject(1),
                BindCommand::Draw(1),
                BindCommand::BindObject(2),
                BindCommand::Draw(2),
            ]
        );
    }

    #[test]
    fn material_is_rebound_after_a_pipeline_switch() {
        let items = [
            item(PipelineKind::WorldLitTextured, 0, 0),
            item(PipelineKind::UnlitTextured, 0, 1),
        ];
        let stats = RenderStats::from_commands(&plan_draws(&items));
        assert_eq!(stats.material_binds, 2);
    }

    #[test]
    fn every_draw_is_preceded_by_its_object_group() {
        let items = [
            item(PipelineKind::UnlitTextured, 1, 5),
            item(PipelineKind::UnlitTextured, 0, 6),
        ];
        let commands = plan_draws(&items);
        for (index, command) in commands.iter().enumerate() {
            if let BindCommand::Draw(object) = command {
                let last_object = commands[..index].iter().rev().find_map(|c| match c {
                    BindCommand::BindObject(o) => Some(*o),
                    _ => None,
                });
                assert_eq!(last_object, Some(*object));
            }
        }
        assert_eq!(commands.iter().filter_map(BindCommand::group).min(), Some(0));
    }

    #[test]
    fn empty_frame_plans_nothing() {
        assert!(plan_draws(&[]).is_empty());
    }
}
