use crate::document::{EntityRecord, StructureDocument};
use lodestone_common::{BlockPos, LodestoneError, Position, Result};
use std::collections::HashMap;

/// The six axis-aligned directions a block's "facing" property can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Up,
        Direction::Down,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    pub fn from_name(name: &str) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.name() == name)
    }

    /// Unit vector in grid space. North is -z, east is +x.
    pub fn unit_vector(&self) -> (i32, i32, i32) {
        match self {
            Direction::North => (0, 0, -1),
            Direction::South => (0, 0, 1),
            Direction::East => (1, 0, 0),
            Direction::West => (-1, 0, 0),
            Direction::Up => (0, 1, 0),
            Direction::Down => (0, -1, 0),
        }
    }

    pub fn from_vector(vector: (i32, i32, i32)) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.unit_vector() == vector)
    }
}

impl StructureDocument {
    /// Returns a new document rotated about the vertical axis by
    /// `angle_degrees`, which must be a multiple of 90. The block map is
    /// rebuilt from scratch; the source document is never mutated.
    ///
    /// Entity positions rotate with the blocks (the continuous position
    /// unsnapped, the grid position snapped); their payloads are untouched.
    pub fn rotated(&self, angle_degrees: i32) -> Result<StructureDocument> {
        if angle_degrees % 90 != 0 {
            return Err(LodestoneError::UnsupportedRotation(angle_degrees));
        }

        // Normalize before the trigonometry so large multiples carry no
        // accumulated floating-point error into the snap.
        let radians = (angle_degrees.rem_euclid(360) as f64).to_radians();
        let (sin, cos) = radians.sin_cos();

        let mut blocks = HashMap::with_capacity(self.blocks.len());
        for (position, state) in &self.blocks {
            let mut state = state.clone();

            let facing = state
                .properties
                .get("facing")
                .and_then(|name| Direction::from_name(name));
            if let Some(direction) = facing {
                let (x, y, z) = direction.unit_vector();
                let rotated = snap(rotate_planar(x as f64, z as f64, sin, cos));
                // A vector that snaps to no axis direction leaves the
                // property value as it was.
                if let Some(rotated) = Direction::from_vector((rotated.0, y, rotated.1)) {
                    state
                        .properties
                        .insert("facing".to_string(), rotated.name().to_string());
                }
            }

            blocks.insert(rotate_block_pos(*position, sin, cos), state);
        }

        let entities = self
            .entities
            .iter()
            .map(|entity| {
                let (x, z) = rotate_planar(entity.position.x, entity.position.z, sin, cos);
                EntityRecord {
                    position: Position::new(x, entity.position.y, z),
                    block_position: rotate_block_pos(entity.block_position, sin, cos),
                    nbt: entity.nbt.clone(),
                }
            })
            .collect();

        Ok(StructureDocument {
            dimensions: self.dimensions,
            blocks,
            entities,
        })
    }
}

/// `(x, z) -> (x·cosθ − z·sinθ, x·sinθ + z·cosθ)`, the planar rotation
/// about the vertical axis.
fn rotate_planar(x: f64, z: f64, sin: f64, cos: f64) -> (f64, f64) {
    (cos * x - sin * z, sin * x + cos * z)
}

fn snap(planar: (f64, f64)) -> (i32, i32) {
    (planar.0.round() as i32, planar.1.round() as i32)
}

fn rotate_block_pos(position: BlockPos, sin: f64, cos: f64) -> BlockPos {
    let (x, z) = snap(rotate_planar(position.x as f64, position.z as f64, sin, cos));
    BlockPos::new(x, position.y, z)
}
