mod presets;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cubeforge_mesher::atlas::AtlasTable;
use cubeforge_mesher::mesh::{Mesh, MeshBuilder};
use cubeforge_mesher::settings::MesherSettings;
use cubeforge_shared::chunk::ChunkData;
use tracing::info;

use presets::Preset;

struct Options {
    preset: Preset,
    seed: u64,
    chunk: Option<PathBuf>,
    settings: Option<PathBuf>,
    atlas: Option<PathBuf>,
    dump: Option<PathBuf>,
    save_chunk: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            preset: Preset::Terrain,
            seed: 1,
            chunk: None,
            settings: None,
            atlas: None,
            dump: None,
            save_chunk: None,
        }
    }
}

fn usage() -> String {
    format!(
        "Usage: mesh_inspector [--preset {}] [--seed <u64>] [--chunk <file.bin>] \
         [--settings <file.toml>] [--atlas <file.toml>] [--dump <prefix>] \
         [--save-chunk <file.bin>]",
        Preset::NAMES
    )
}

fn main() {
    let _ = tracing_subscriber::fmt().with_target(false).try_init();

    let mut options = Options::default();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = |expects: &str| {
            args.next().unwrap_or_else(|| {
                eprintln!("{arg} expects {expects}");
                std::process::exit(2);
            })
        };
        match arg.as_str() {
            "--preset" => {
                let name = value("a preset name");
                let Some(preset) = Preset::parse(&name) else {
                    eprintln!("unknown preset '{name}' (expected {})", Preset::NAMES);
                    std::process::exit(2);
                };
                options.preset = preset;
            }
            "--seed" => {
                let raw = value("a numeric argument");
                match raw.parse::<u64>() {
                    Ok(seed) => options.seed = seed,
                    Err(err) => {
                        eprintln!("invalid seed '{raw}': {err}");
                        std::process::exit(2);
                    }
                }
            }
            "--chunk" => options.chunk = Some(PathBuf::from(value("a path argument"))),
            "--settings" => options.settings = Some(PathBuf::from(value("a path argument"))),
            "--atlas" => options.atlas = Some(PathBuf::from(value("a path argument"))),
            "--dump" => options.dump = Some(PathBuf::from(value("a path prefix"))),
            "--save-chunk" => options.save_chunk = Some(PathBuf::from(value("a path argument"))),
            "--help" | "-h" => {
                println!("{}", usage());
                return;
            }
            other => {
                eprintln!("unknown argument: {other}");
                eprintln!("{}", usage());
                std::process::exit(2);
            }
        }
    }

    if let Err(err) = run(&options) {
        eprintln!("mesh_inspector error: {err}");
        std::process::exit(1);
    }
}

fn run(options: &Options) -> Result<(), String> {
    let settings = match &options.settings {
        Some(path) => MesherSettings::load(path).map_err(|err| err.to_string())?,
        None => MesherSettings::default(),
    };

    let atlas_path = options.atlas.as_ref().or(settings.atlas_manifest.as_ref());
    let atlas = match atlas_path {
        Some(path) => AtlasTable::load(path).map_err(|err| err.to_string())?,
        None => AtlasTable::default(),
    };
    let builder = MeshBuilder::new(Arc::new(atlas), settings.capacity);

    let grid = match &options.chunk {
        Some(path) => load_chunk(path)?,
        None => options.preset.build(options.seed),
    };
    if let Some(path) = &options.save_chunk {
        save_chunk(path, &grid)?;
    }

    let mesh = builder
        .generate_mesh(&grid)
        .map_err(|err| format!("meshing failed: {err}"))?;
    print_report(&grid, &mesh, &builder);

    if let Some(prefix) = &options.dump {
        dump_buffers(prefix, &mesh)?;
    }
    Ok(())
}

fn load_chunk(path: &Path) -> Result<ChunkData, String> {
    let bytes =
        fs::read(path).map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    let grid = bincode::deserialize::<ChunkData>(&bytes)
        .map_err(|err| format!("failed to decode {}: {err}", path.display()))?;
    info!("Loaded chunk grid from {}", path.display());
    Ok(grid)
}

fn save_chunk(path: &Path, grid: &ChunkData) -> Result<(), String> {
    let bytes = bincode::serialize(grid).map_err(|err| format!("failed to encode chunk: {err}"))?;
    fs::write(path, bytes).map_err(|err| format!("failed to write {}: {err}", path.display()))?;
    info!("Saved chunk grid to {}", path.display());
    Ok(())
}

fn print_report(grid: &ChunkData, mesh: &Mesh, builder: &MeshBuilder) {
    println!("Capacity policy: {:?}", builder.capacity());
    println!("Solid voxels: {}", grid.solid_count());
    println!("Faces: {}", mesh.face_count());
    println!(
        "Vertices: {} / {} reserved ({} bytes)",
        mesh.vertex_count(),
        mesh.vertex_reserved(),
        mesh.vertex_bytes().len()
    );
    println!(
        "Indices: {} / {} reserved ({} bytes)",
        mesh.index_count(),
        mesh.index_reserved(),
        mesh.index_bytes().len()
    );
}

fn dump_buffers(prefix: &Path, mesh: &Mesh) -> Result<(), String> {
    for (suffix, bytes) in [
        ("vertices.bin", mesh.vertex_bytes()),
        ("indices.bin", mesh.index_bytes()),
    ] {
        let mut name = prefix.as_os_str().to_owned();
        name.push(".");
        name.push(suffix);
        let path = PathBuf::from(name);
        fs::write(&path, bytes)
            .map_err(|err| format!("failed to write {}: {err}", path.display()))?;
        println!("Wrote {} bytes to {}", bytes.len(), path.display());
    }
    Ok(())
}
