//! Example scene demonstrating the transform graph

use scene2d::prelude::*;

fn main() {
    env_logger::init();

    log::info!("Building demo hierarchy");
    let mut graph = TransformGraph::new();

    // A tank: the hull carries a turret, the turret carries the barrel tip.
    let hull = graph.insert();
    graph.set_position(hull, Vec2::new(10.0, 4.0));

    let turret = graph.insert();
    graph.set_parent(turret, Some(hull));
    graph.set_position(turret, Vec2::new(0.5, 0.0));

    let barrel_tip = graph.insert();
    graph.set_parent(barrel_tip, Some(turret));
    graph.set_position(barrel_tip, Vec2::new(2.0, 0.0));

    // Drive forward while the turret tracks a target. Only the barrel tip is
    // read each frame; everything above it settles lazily.
    for frame in 0..5 {
        graph.translate(hull, Vec2::new(2.0, 0.0));
        graph.set_rotation(turret, frame as f32 * 0.2);

        if let Some(tip) = graph.world_position(barrel_tip) {
            log::info!("frame {frame}: barrel tip at ({:.2}, {:.2})", tip.x, tip.y);
        }
    }

    // The turret gets craned onto a recovery vehicle mid-scene.
    let recovery = graph.insert();
    graph.set_position(recovery, Vec2::new(-20.0, 0.0));
    graph.set_parent(turret, Some(recovery));

    if let Some(tip) = graph.world_position(barrel_tip) {
        log::info!("after transfer: barrel tip at ({:.2}, {:.2})", tip.x, tip.y);
    }

    // Round-trip the whole scene through a RON document.
    let doc = SceneDoc::capture("demo", &graph);
    let path = std::env::temp_dir().join("scene2d_demo.ron");

    if let Err(e) = doc.save_ron(&path) {
        log::error!("failed to save scene: {e}");
        return;
    }

    match SceneDoc::load_ron(&path) {
        Ok(loaded) => {
            let mut restored = TransformGraph::new();
            match loaded.instantiate(&mut restored) {
                Ok(scene) => {
                    log::info!(
                        "restored {} nodes from {}",
                        scene.nodes.len(),
                        path.display()
                    );
                    for &id in &scene.nodes {
                        if let Some(pos) = restored.world_position(id) {
                            log::info!("node {id}: world ({:.2}, {:.2})", pos.x, pos.y);
                        }
                    }
                }
                Err(e) => log::error!("failed to instantiate scene: {e}"),
            }
        }
        Err(e) => log::error!("failed to load scene: {e}"),
    }
}
