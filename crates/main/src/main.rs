use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use facet_report::scoring::score_form;
use facet_report::{forms, ContentPack, ReportBuilder};

/// Renders personality reports from submitted forms.
///
/// Fonts must be present under `assets/fonts` next to the binary or in the
/// `facet_report` crate, or be provided via the `FACET_REPORT_FONTS_DIR`
/// environment variable, before running `render`.
#[derive(Parser)]
#[command(author, version, about = "Personality report renderer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the forms into a PDF report.
    Render {
        /// JSON file holding one form or a list of forms.
        #[arg(long)]
        forms: PathBuf,
        /// JSON content pack with factor, facet and feedback texts.
        #[arg(long)]
        content: PathBuf,
        /// Report title shown on the cover and in the page header.
        #[arg(long)]
        title: Option<String>,
        /// Line shown under the cover title.
        #[arg(long)]
        subtitle: Option<String>,
        /// Closing credits line; repeat for several lines.
        #[arg(long = "credit")]
        credits: Vec<String>,
        /// Output path.
        #[arg(long, short, default_value = "relatorio.pdf")]
        out: PathBuf,
    },

    /// Print the facet scores of each form as JSON.
    Score {
        /// JSON file holding one form or a list of forms.
        #[arg(long)]
        forms: PathBuf,
        /// JSON content pack with the facet questions.
        #[arg(long)]
        content: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            forms,
            content,
            title,
            subtitle,
            credits,
            out,
        } => render(forms, content, title, subtitle, credits, out),
        Commands::Score { forms, content } => score(forms, content),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn render(
    forms_path: PathBuf,
    content_path: PathBuf,
    title: Option<String>,
    subtitle: Option<String>,
    credits: Vec<String>,
    out: PathBuf,
) -> Result<(), Box<dyn Error>> {
    let forms = forms::load_submissions(&forms_path)?;
    let content = ContentPack::from_path(&content_path)?;

    let mut builder = ReportBuilder::new(content).with_credits(credits);
    if let Some(title) = title {
        builder = builder.with_title(title);
    }
    if let Some(subtitle) = subtitle {
        builder = builder.with_subtitle(subtitle);
    }

    let bytes = builder.build(&forms)?;
    std::fs::write(&out, &bytes)?;
    println!("Wrote {} ({} bytes)", out.display(), bytes.len());
    Ok(())
}

fn score(forms_path: PathBuf, content_path: PathBuf) -> Result<(), Box<dyn Error>> {
    let forms = forms::load_submissions(&forms_path)?;
    let content = ContentPack::from_path(&content_path)?;

    let mut summaries = Vec::with_capacity(forms.len());
    for form in &forms {
        match score_form(&content, form) {
            Some(summary) => summaries.push(summary),
            None => eprintln!("Skipping form '{}': factor not found", form.identifier),
        }
    }

    println!("{}", serde_json::to_string_pretty(&summaries)?);
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
