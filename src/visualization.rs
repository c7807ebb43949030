//! 3D visualization of a puzzle and its solution using kiss3d.

use kiss3d::prelude::*;

use lazor::block::BlockType;
use lazor::geometry::Point;
use lazor::grid::Board;

/// Side of one block in world units. Points sit half a block apart.
const BLOCK_SIZE: f32 = 1.0;
/// Height at which laser paths and checkpoints float above the board.
const BEAM_HEIGHT: f32 = 0.25;

/// Returns the display color for a cell.
fn block_color(block_type: BlockType) -> Color {
    match block_type {
        BlockType::Empty => Color::new(0.25, 0.25, 0.25, 1.0), // dark grey
        BlockType::FixedBlocker => Color::new(0.05, 0.05, 0.05, 1.0), // black
        BlockType::Reflect => Color::new(0.2, 0.3, 1.0, 1.0),  // blue
        BlockType::Opaque => Color::new(0.8, 0.8, 0.8, 1.0),   // light grey
        BlockType::Refract => Color::new(0.2, 0.9, 0.3, 1.0),  // green
    }
}

/// Maps a point to world space, centering the board on the origin.
///
/// Point `x` runs along world X and point `y` along world Z.
fn point_to_world(point: Point, board: &Board, height: f32) -> Vec3 {
    let half = BLOCK_SIZE / 2.0;
    Vec3::new(
        point.0 as f32 * half - board.rows() as f32 * half,
        height,
        point.1 as f32 * half - board.cols() as f32 * half,
    )
}

/// Builds the scene for one board and returns its nodes.
///
/// Blocks are flat slabs, every traced laser point is a small red cube with
/// a second cube halfway to the next point, and checkpoints are larger
/// yellow cubes.
fn build_scene(scene: &mut SceneNode3d, board: &Board, checkpoints: &[Point]) -> Vec<SceneNode3d> {
    const SLAB_GAP: f32 = 0.05;
    const BEAM_SIZE: f32 = 0.08;
    const CHECKPOINT_SIZE: f32 = 0.2;

    let mut nodes = Vec::new();

    for ((i, j), block_type) in board.blocks() {
        let thickness = match block_type {
            BlockType::Empty => 0.02,
            BlockType::FixedBlocker => 0.05,
            _ => 0.3,
        };
        let center = point_to_world((2 * i + 1, 2 * j + 1), board, thickness / 2.0 - 0.2);
        let node = scene
            .add_cube(BLOCK_SIZE - SLAB_GAP, thickness, BLOCK_SIZE - SLAB_GAP)
            .set_color(block_color(block_type))
            .set_position(center);
        nodes.push(node);
    }

    for (_, trace) in board.trace_all() {
        for (step, &point) in trace.path.iter().enumerate() {
            let position = point_to_world(point, board, BEAM_HEIGHT);
            let mut beam_points = vec![position];
            if let Some(&next) = trace.path.get(step + 1) {
                let next_position = point_to_world(next, board, BEAM_HEIGHT);
                beam_points.push((position + next_position) / 2.0);
            }
            for beam_point in beam_points {
                let node = scene
                    .add_cube(BEAM_SIZE, BEAM_SIZE, BEAM_SIZE)
                    .set_color(Color::new(1.0, 0.1, 0.1, 1.0))
                    .set_position(beam_point);
                nodes.push(node);
            }
        }
    }

    for &checkpoint in checkpoints {
        let node = scene
            .add_cube(CHECKPOINT_SIZE, CHECKPOINT_SIZE, CHECKPOINT_SIZE)
            .set_color(Color::new(1.0, 0.9, 0.1, 1.0))
            .set_position(point_to_world(checkpoint, board, BEAM_HEIGHT));
        nodes.push(node);
    }

    nodes
}

/// Displays boards in an interactive 3D viewer, one at a time.
pub fn display(boards: Vec<(String, Board)>, checkpoints: &[Point]) {
    pollster::block_on(display_async(boards, checkpoints));
}

async fn display_async(boards: Vec<(String, Board)>, checkpoints: &[Point]) {
    if boards.is_empty() {
        println!("Nothing to display");
        return;
    }

    let num_boards = boards.len();
    let mut current_board_index = 0;
    let title = |index: usize| {
        format!(
            "{} ({}/{}) - [Left/Right] switch, [R] reset view",
            boards[index].0,
            index + 1,
            num_boards
        )
    };

    let mut window = Window::new(&title(current_board_index)).await;

    let (rows, cols) = (boards[0].1.rows(), boards[0].1.cols());
    let default_dist = rows.max(cols) as f32 * BLOCK_SIZE * 2.0 + 2.0;
    let mut camera = OrbitCamera3d::default();
    camera.set_dist(default_dist);

    let mut scene = SceneNode3d::empty();
    scene
        .add_light(Light::point(100.0))
        .set_position(Vec3::new(5.0, 10.0, 5.0));

    let mut nodes = build_scene(&mut scene, &boards[current_board_index].1, checkpoints);
    let mut needs_rebuild = false;

    loop {
        for event in window.events().iter() {
            if let kiss3d::event::WindowEvent::Key(key, action, _) = event.value {
                use kiss3d::event::{Action, Key};
                if action == Action::Press {
                    match key {
                        Key::R => camera.set_dist(default_dist),
                        Key::Right => {
                            current_board_index = (current_board_index + 1) % num_boards;
                            needs_rebuild = true;
                        }
                        Key::Left => {
                            current_board_index = current_board_index
                                .checked_sub(1)
                                .unwrap_or(num_boards - 1);
                            needs_rebuild = true;
                        }
                        _ => {}
                    }
                }
            }
        }

        if needs_rebuild {
            for mut node in nodes.drain(..) {
                node.remove();
            }
            nodes = build_scene(&mut scene, &boards[current_board_index].1, checkpoints);
            window.set_title(&title(current_board_index));
            needs_rebuild = false;
        }

        if !window.render_3d(&mut scene, &mut camera).await {
            break;
        }
    }
}
