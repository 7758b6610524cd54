use anyhow::Context;
use clap::{App, Arg};
use image::Rgba;
use std::path::Path;

use locmap_overlay::catalog::PoiInstance;
use locmap_overlay::compositor::OverlayCompositor;
use locmap_overlay::config::OverlayConfig;
use locmap_overlay::host::{OverlayHost, OverlayManager};
use locmap_overlay::map_data::MapInfo;
use locmap_overlay::memory::{
    FlatIconRenderer, LoopbackTransport, MessageKind, StaticCatalog, StaticRegistry,
};
use locmap_overlay::sync::{PeerId, Role, SyncController};
use locmap_protocol::{TypeHash, Vec3};

const AUTHORITY: PeerId = PeerId(1);
const FOLLOWER: PeerId = PeerId(2);

fn poi(prefab: &str, hash: i32, x: f32, y: f32, z: f32) -> PoiInstance {
    PoiInstance {
        prefab_name: prefab.to_string(),
        position: Vec3::new(x, y, z),
        type_hash: TypeHash(hash),
    }
}

/// Synthetic world: three custom prefabs across two content packs, plus a
/// vanilla prefab the selector must filter out.
fn build_world() -> (StaticCatalog, StaticRegistry) {
    let mut registry = StaticRegistry::new();
    registry.register("ancient_altar", "AncientRuins");
    registry.register("ancient_tower", "AncientRuins");
    registry.register("trader_camp", "Wayfarers");

    let catalog = StaticCatalog::new(vec![
        poi("ancient_altar", 101, -220.0, 4.0, 310.0),
        poi("ancient_altar", 101, 35.0, 12.0, -80.0),
        poi("ancient_tower", 102, 140.0, 30.0, 140.0),
        poi("trader_camp", 201, -60.0, 8.0, -250.0),
        poi("stone_circle", 999, 80.0, 0.0, 80.0),
    ]);
    (catalog, registry)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let matches = App::new("overlay_demo")
        .about("Runs a location sync between an authority and a follower over a loopback transport and writes the follower's overlay layers as PNGs")
        .arg(
            Arg::with_name("OUT")
                .long("out")
                .takes_value(true)
                .default_value("out")
                .help("Output directory for overlay PNGs"),
        )
        .arg(
            Arg::with_name("CONFIG")
                .long("config")
                .takes_value(true)
                .help("Path to a TOML config file"),
        )
        .arg(
            Arg::with_name("TEXTURE_SIZE")
                .long("texture-size")
                .takes_value(true)
                .default_value("256")
                .help("Overlay texture size in pixels"),
        )
        .get_matches();

    let config = match matches.value_of("CONFIG") {
        Some(path) => OverlayConfig::load(Path::new(path))?,
        None => OverlayConfig::default(),
    };
    let texture_size: u32 = matches
        .value_of("TEXTURE_SIZE")
        .unwrap()
        .parse()
        .context("invalid --texture-size")?;

    let (catalog, registry) = build_world();
    let mapper = MapInfo {
        world_diameter: 1024.0,
    };

    let authority_renderer = FlatIconRenderer::new(Rgba([64, 160, 255, 255]), 8);
    let authority_compositor = OverlayCompositor::new(
        &catalog,
        &registry,
        &authority_renderer,
        &mapper,
        config.clone(),
    );
    let mut authority = SyncController::new(
        Role::Authority,
        &catalog,
        &registry,
        authority_compositor,
        LoopbackTransport::new(),
    );

    let follower_renderer = FlatIconRenderer::new(Rgba([255, 200, 64, 255]), 8);
    let follower_compositor = OverlayCompositor::new(
        &catalog,
        &registry,
        &follower_renderer,
        &mapper,
        config,
    );
    let mut follower = SyncController::new(
        Role::Follower {
            authority: AUTHORITY,
        },
        &catalog,
        &registry,
        follower_compositor,
        LoopbackTransport::new(),
    );

    authority.bind_channel()?;
    follower.bind_channel()?;

    let mut follower_host = OverlayManager::new(texture_size);

    // Pump the loopback: follower pull -> authority response -> follower
    // composite.
    follower.on_world_ready(&mut follower_host)?;
    let request = follower
        .transport_mut()
        .take()
        .context("follower sent no request")?;
    anyhow::ensure!(request.kind == MessageKind::Request);

    authority.on_request(FOLLOWER)?;
    let response = authority
        .transport_mut()
        .take()
        .context("authority sent no response")?;
    anyhow::ensure!(response.kind == MessageKind::Response);

    let summary = follower.on_response(&mut follower_host, &response.payload)?;
    println!(
        "composited {} records ({} skipped) onto {} overlay layer(s)",
        summary.placed,
        summary.skipped,
        follower_host.len()
    );

    // Layers come up disabled; the embedding UI enables them once populated.
    let groups: Vec<String> = follower_host.layers().map(|(g, _)| g.to_string()).collect();
    for group in &groups {
        if let Some(layer) = follower_host.layer_mut(group) {
            layer.enabled = true;
        }
    }

    let out_dir = Path::new(matches.value_of("OUT").unwrap());
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    for (group, layer) in follower_host.layers() {
        let path = out_dir.join(format!("{group}.png"));
        layer
            .image()
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("wrote {}", path.display());
    }

    Ok(())
}
