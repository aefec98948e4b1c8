use anyhow::Context;
use artshelf_gallery::Action;
use artshelf_gallery::Gallery;
use artshelf_gallery::SelectorDomain;
use artshelf_gallery::SelectorSort;
use artshelf_gallery::SortMode;
use artshelf_gallery::factory;
use artshelf_gallery::factory::Backend;
use artshelf_gallery::state::NewItem;
use artshelf_gallery::types::Category;
use artshelf_gallery::types::ItemState;
use artshelf_gallery::types::TagCategoryAssignment;
use artshelf_gallery::view::ItemCard;
use artshelf_gallery::view::TagChip;
use base64::Engine;
use chrono::Utc;
use clap::Parser;
use std::path::Path;
use std::path::PathBuf;

/// Tag, filter and browse a local image gallery.
#[derive(Debug, Parser)]
#[command(name = "artshelf", version)]
pub struct Cli {
    /// Directory holding `.artshelf/`; defaults to the current directory.
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Storage backend; overrides `ARTSHELF_BACKEND`.
    #[arg(long, global = true, value_enum)]
    pub backend: Option<BackendArg>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum BackendArg {
    Jsonl,
    Sqlite,
}

impl From<BackendArg> for Backend {
    fn from(b: BackendArg) -> Self {
        match b {
            BackendArg::Jsonl => Backend::Jsonl,
            BackendArg::Sqlite => Backend::Sqlite,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PickDomain {
    Tag,
    Author,
}

impl From<PickDomain> for SelectorDomain {
    fn from(d: PickDomain) -> Self {
        match d {
            PickDomain::Tag => SelectorDomain::Tag,
            PickDomain::Author => SelectorDomain::Author,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PickSort {
    Priority,
    Name,
    Recent,
}

impl From<PickSort> for SelectorSort {
    fn from(s: PickSort) -> Self {
        match s {
            PickSort::Priority => SelectorSort::Priority,
            PickSort::Name => SelectorSort::Name,
            PickSort::Recent => SelectorSort::Recent,
        }
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Import an image file as a new item.
    Add {
        image: PathBuf,
        /// Comma separated tags.
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long, default_value = "")]
        author: String,
        #[arg(long, default_value = "")]
        url: String,
    },
    /// List items after filtering and sorting.
    List {
        #[arg(long, conflicts_with = "author")]
        tag: Option<String>,
        #[arg(long)]
        author: Option<String>,
        /// `dateDesc`, `dateAsc` or `fav`; anything else keeps stored order.
        #[arg(long, default_value = "dateDesc")]
        sort: SortMode,
        #[arg(long)]
        json: bool,
    },
    /// Show the tag palette (by priority and recent use, or `--alpha`).
    Tags {
        #[arg(long)]
        alpha: bool,
        #[arg(long)]
        json: bool,
    },
    /// Show one item.
    Show {
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Toggle the favorite flag.
    Fav { id: i64 },
    /// Set the workflow state (`none`, `todo`, `doing`, `done`).
    State {
        id: i64,
        #[arg(value_parser = parse_state)]
        state: ItemState,
    },
    /// Edit an item; all changes are saved together.
    Edit {
        id: i64,
        #[arg(long = "add-tag")]
        add_tags: Vec<String>,
        #[arg(long = "remove-tag")]
        remove_tags: Vec<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long, value_parser = parse_state)]
        state: Option<ItemState>,
        /// Replace the image with this file.
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete an item.
    Rm { id: i64 },
    /// Manage tag categories.
    Category {
        #[command(subcommand)]
        cmd: CategoryCommand,
    },
    /// Assign a tag to a category and/or priority.
    Assign {
        tag: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(
            long,
            default_value_t = 0.0,
            allow_negative_numbers = true,
            value_parser = parse_priority
        )]
        priority: f64,
    },
    /// Drop a tag's category assignment.
    Unassign { tag: String },
    /// List picker entries; with `--item` and `--choose`, apply the choice.
    Pick {
        #[arg(value_enum)]
        domain: PickDomain,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, value_enum, default_value_t = PickSort::Priority)]
        sort: PickSort,
        #[arg(long)]
        item: Option<i64>,
        #[arg(long, requires = "item")]
        choose: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Export all records to stdout as JSONL.
    Export,
    /// Import JSONL records from stdin.
    Import,
    /// Show record counts.
    Stats,
    /// Copy a JSONL data directory into a SQLite database.
    Migrate {
        /// Source directory holding the JSONL files
        #[arg(long)]
        jsonl: PathBuf,
        /// Destination SQLite database file
        #[arg(long)]
        sqlite: PathBuf,
    },
}

#[derive(Debug, clap::Subcommand)]
pub enum CategoryCommand {
    Add { id: String, name: String, color: String },
    Rm { id: String },
    List,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    if let Command::Migrate { jsonl, sqlite } = &cli.cmd {
        let n = artshelf_gallery::migrate::migrate_jsonl_to_sqlite(jsonl, sqlite)?;
        println!("Migrated {n} records");
        return Ok(());
    }

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let store = factory::open_store(&root, cli.backend.map(Backend::from))?;
    let mut gallery = Gallery::open(store);

    match cli.cmd {
        Command::Add {
            image,
            tags,
            author,
            url,
        } => {
            let image = read_data_url(&image)?;
            apply(
                &mut gallery,
                Action::ImportItem(NewItem {
                    image,
                    url,
                    author,
                    tags,
                    now: Utc::now(),
                }),
            )?;
            if let Some(item) = gallery.state().items().first() {
                println!("{}", item.id);
            }
        }
        Command::List {
            tag,
            author,
            sort,
            json,
        } => {
            if let Some(tag) = tag {
                apply(&mut gallery, Action::ToggleTagFilter(tag))?;
            }
            if let Some(author) = author {
                apply(&mut gallery, Action::FilterByAuthor(author))?;
            }
            apply(&mut gallery, Action::SetSort(sort))?;
            let view = gallery.view();
            if json {
                println!("{}", serde_json::to_string_pretty(&view.items)?);
            } else {
                for card in &view.items {
                    println!("{}", card_line(card));
                }
            }
        }
        Command::Tags { alpha, json } => {
            let view = gallery.view();
            let chips = if alpha { view.all_tags } else { view.recent_tags };
            print_chips(&chips, json)?;
        }
        Command::Show { id, json } => {
            let state = gallery.state();
            let item = state
                .item(id)
                .with_context(|| format!("item not found: {id}"))?;
            let card = state.item_card(item);
            if json {
                println!("{}", serde_json::to_string_pretty(&card)?);
            } else {
                println!("id:      {}", card.id);
                println!("created: {}", card.created_at);
                println!("author:  {}", card.author.as_deref().unwrap_or("-"));
                println!("url:     {}", card.url.as_deref().unwrap_or("-"));
                println!("state:   {}", state_label(card.state));
                println!("fav:     {}", card.favorite);
                for chip in &card.tags {
                    println!("tag:     {}", chip_line(chip));
                }
            }
        }
        Command::Fav { id } => {
            require_item(&gallery, id)?;
            apply(&mut gallery, Action::ToggleFavorite(id))?;
            let fav = gallery.state().item(id).is_some_and(|i| i.favorite);
            println!("{}", if fav { "favorite" } else { "not favorite" });
        }
        Command::State { id, state } => {
            require_item(&gallery, id)?;
            apply(&mut gallery, Action::SetState(id, state))?;
        }
        Command::Edit {
            id,
            add_tags,
            remove_tags,
            author,
            url,
            state,
            image,
        } => {
            require_item(&gallery, id)?;
            let mut actions = vec![Action::OpenItem(id)];
            actions.extend(remove_tags.into_iter().map(Action::DraftRemoveTag));
            actions.extend(add_tags.into_iter().map(Action::DraftAddTag));
            if let Some(author) = author {
                actions.push(Action::DraftSetAuthor(author));
            }
            if let Some(url) = url {
                actions.push(Action::DraftSetUrl(url));
            }
            if let Some(state) = state {
                actions.push(Action::DraftSetState(state));
            }
            if let Some(path) = image {
                actions.push(Action::DraftReplaceImage(read_data_url(&path)?));
            }
            actions.push(Action::SaveEdit);
            for action in actions {
                apply(&mut gallery, action)?;
            }
        }
        Command::Rm { id } => {
            require_item(&gallery, id)?;
            apply(&mut gallery, Action::DeleteItem(id))?;
        }
        Command::Category { cmd } => match cmd {
            CategoryCommand::Add { id, name, color } => {
                apply(&mut gallery, Action::PutCategory(Category { id, name, color }))?;
            }
            CategoryCommand::Rm { id } => {
                apply(&mut gallery, Action::DeleteCategory(id))?;
            }
            CategoryCommand::List => {
                for c in gallery.state().categories() {
                    println!("{}\t{}\t{}", c.id, c.name, c.color);
                }
            }
        },
        Command::Assign {
            tag,
            category,
            priority,
        } => {
            if let Some(id) = category.as_deref()
                && !gallery.state().categories().iter().any(|c| c.id == id)
            {
                tracing::warn!("category {id:?} does not exist; {tag:?} will show uncategorized");
            }
            apply(
                &mut gallery,
                Action::AssignTag(TagCategoryAssignment {
                    tag,
                    category_id: category.filter(|c| !c.is_empty()),
                    priority,
                }),
            )?;
        }
        Command::Unassign { tag } => {
            apply(&mut gallery, Action::UnassignTag(tag))?;
        }
        Command::Pick {
            domain,
            search,
            sort,
            item,
            choose,
            json,
        } => {
            if let Some(id) = item {
                require_item(&gallery, id)?;
                apply(&mut gallery, Action::OpenItem(id))?;
            }
            apply(&mut gallery, Action::OpenSelector(domain.into()))?;
            apply(&mut gallery, Action::SetSelectorSearch(search))?;
            apply(&mut gallery, Action::SetSelectorSort(sort.into()))?;

            if let (Some(id), Some(choice)) = (item, choose) {
                if !gallery
                    .state()
                    .selector_entries()
                    .iter()
                    .any(|e| e.name == choice)
                {
                    anyhow::bail!("no entry named {choice:?}");
                }
                apply(&mut gallery, Action::SelectorPick(choice))?;
                apply(&mut gallery, Action::SelectorConfirm)?;
                apply(&mut gallery, Action::SaveEdit)?;
                println!("updated {id}");
            } else if let Some(picker) = gallery.view().picker {
                print_chips(&picker.entries, json)?;
            }
        }
        Command::Export => {
            let mut out = std::io::stdout();
            gallery.store().export(&mut out)?;
        }
        Command::Import => {
            let mut input = std::io::stdin();
            let n = gallery.store().import(&mut input)?;
            println!("Imported {n} records");
        }
        Command::Stats => {
            let stats = gallery.store().stats()?;
            println!("{stats}");
        }
        Command::Migrate { .. } => {}
    }
    Ok(())
}

/// Read an image file into a `data:` URL.
pub fn read_data_url(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{mime};base64,{encoded}"))
}

fn apply(gallery: &mut Gallery, action: Action) -> anyhow::Result<()> {
    if !gallery.dispatch(action) {
        anyhow::bail!("store write failed; nothing was changed");
    }
    Ok(())
}

fn require_item(gallery: &Gallery, id: i64) -> anyhow::Result<()> {
    if gallery.state().item(id).is_none() {
        anyhow::bail!("item not found: {id}");
    }
    Ok(())
}

fn parse_state(s: &str) -> Result<ItemState, String> {
    s.parse().map_err(|e: anyhow::Error| e.to_string())
}

fn parse_priority(s: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(p) if p.is_finite() => Ok(p),
        _ => Err(format!("not a finite number: {s}")),
    }
}

fn state_label(state: ItemState) -> &'static str {
    match state {
        ItemState::Unset => "-",
        other => other.as_str(),
    }
}

fn card_line(card: &ItemCard) -> String {
    let star = if card.favorite { "*" } else { "-" };
    let author = card.author.as_deref().unwrap_or("-");
    let tags: Vec<&str> = card.tags.iter().map(|t| t.name.as_str()).collect();
    format!(
        "{}\t{star}\t{}\t{author}\t{}",
        card.id,
        state_label(card.state),
        tags.join(",")
    )
}

fn chip_line(chip: &TagChip) -> String {
    let category = chip.category.as_deref().unwrap_or("-");
    format!("{}\t{}\t{category}", chip.name, chip.priority)
}

fn print_chips(chips: &[TagChip], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(chips)?);
    } else {
        for chip in chips {
            println!("{}", chip_line(chip));
        }
    }
    Ok(())
}
