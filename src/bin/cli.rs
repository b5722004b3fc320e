use clap::{Parser, Subcommand};
use realmforge::preview::{render_dungeon, render_region, save_png};
use realmforge::{GenerationRequest, SeedInput, generate_dungeon, generate_region};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::Level;

/// Генератор региональных карт и подземелий
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Подробный лог (уровень DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Региональная карта: биомы, поселения, дороги, ориентиры
    Region(Target),
    /// Подземелье: комнаты, коридоры, двери, лестницы
    Dungeon(Target),
}

#[derive(clap::Args, Debug)]
struct Target {
    /// Путь к запросу в формате TOML (без него берутся значения по умолчанию)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Куда сохранить модель в JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Отладочный PNG-предпросмотр
    #[arg(long)]
    png: Option<PathBuf>,

    /// Сид: число или строка (заменяет сид из конфигурации)
    #[arg(long)]
    seed: Option<String>,

    /// Вариация (заменяет вариацию из конфигурации)
    #[arg(long)]
    variation: Option<u32>,

    /// Размер клетки в пикселях для PNG
    #[arg(long, default_value_t = 8)]
    cell_px: u32,
}

impl Target {
    fn load_request(&self) -> Result<GenerationRequest, Box<dyn std::error::Error>> {
        let mut request = match &self.config {
            Some(path) => {
                println!("🔍 Загрузка конфигурации из {}...", path.display());
                GenerationRequest::from_toml_file(path)?
            }
            None => GenerationRequest::default(),
        };
        if let Some(seed) = &self.seed {
            request.seed = seed
                .parse::<u32>()
                .map_or_else(|_| SeedInput::Text(seed.clone()), SeedInput::Number);
        }
        if let Some(variation) = self.variation {
            request.variation = variation;
        }
        Ok(request)
    }
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, value)?;
    println!("Модель сохранена в {}", path.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Command::Region(target) => {
            let request = target.load_request()?;
            let seed = request.seed.resolve();
            println!(
                "Генерация региона (сид {seed}, размер: {}×{})...",
                request.region.width, request.region.height
            );
            let map = generate_region(seed, request.variation, &request.region)?;
            println!(
                "Поселений: {}, дорог: {}, ориентиров: {}",
                map.settlements.len(),
                map.roads.len(),
                map.landmarks.len()
            );
            if let Some(path) = &target.output {
                write_json(&map, path)?;
            }
            if let Some(path) = &target.png {
                save_png(&render_region(&map, target.cell_px), path)?;
                println!("Предпросмотр сохранён в {}", path.display());
            }
        }
        Command::Dungeon(target) => {
            let request = target.load_request()?;
            let seed = request.seed.resolve();
            println!(
                "Генерация подземелья (сид {seed}, размер: {}×{})...",
                request.dungeon.width, request.dungeon.height
            );
            let dungeon = generate_dungeon(seed, request.variation, &request.dungeon)?;
            println!("«{}»: комнат {}", dungeon.title, dungeon.rooms.len());
            for room in &dungeon.rooms {
                println!("  #{} {:?}: {}", room.id, room.role, room.name);
            }
            if let Some(path) = &target.output {
                write_json(&dungeon, path)?;
            }
            if let Some(path) = &target.png {
                save_png(&render_dungeon(&dungeon, target.cell_px), path)?;
                println!("Предпросмотр сохранён в {}", path.display());
            }
        }
    }

    println!("\nГотово!");
    Ok(())
}
