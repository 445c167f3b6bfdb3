//! Command-line interface definitions.
//!
//! Phase selection is done with flags rather than prompts: collection only runs
//! when asked for, and the distance computation always runs on whatever the
//! record stores hold.

use crate::outputs::MatrixFormat;
use clap::Parser;

/// Collect news articles per keyword and compute the semantic distance between keywords.
///
/// # Examples
///
/// ```sh
/// # Distances from previously collected articles
/// keyword_distance -k keywords.txt -s stopwords.txt
///
/// # Collect from BBC News first, then compute
/// keyword_distance --collect
///
/// # Also collect and use the secondary corpus
/// keyword_distance --collect --collect-secondary --use-secondary
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Newline-delimited keyword list
    #[arg(short, long, env = "KEYWORDS_FILE", default_value = "keywords.txt")]
    pub keywords: String,

    /// Newline-delimited stopword list
    #[arg(short, long, env = "STOPWORDS_FILE", default_value = "stopwords.txt")]
    pub stopwords: String,

    /// Optional YAML file overriding the search sources
    #[arg(short, long)]
    pub config: Option<String>,

    /// Search and download articles from the primary source before computing
    #[arg(long)]
    pub collect: bool,

    /// Search and download articles from the secondary source before computing
    #[arg(long)]
    pub collect_secondary: bool,

    /// Append the secondary corpus to each keyword's document
    #[arg(long)]
    pub use_secondary: bool,

    /// Truncate the record stores instead of appending to them when collecting
    #[arg(long)]
    pub fresh: bool,

    /// Maximum number of article links per keyword and source
    #[arg(short = 'n', long, default_value_t = 100)]
    pub max_results: usize,

    /// Primary record store
    #[arg(long, env = "PRIMARY_STORE", default_value = "bbc_article_data.csv")]
    pub primary_store: String,

    /// Secondary record store
    #[arg(long, env = "SECONDARY_STORE", default_value = "add_data.csv")]
    pub secondary_store: String,

    /// Directory for the distance matrix
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// Distance matrix file format
    #[arg(short, long, value_enum, default_value_t = MatrixFormat::Csv)]
    pub format: MatrixFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["keyword_distance"]);

        assert_eq!(cli.keywords, "keywords.txt");
        assert_eq!(cli.stopwords, "stopwords.txt");
        assert!(!cli.collect);
        assert!(!cli.use_secondary);
        assert_eq!(cli.max_results, 100);
        assert_eq!(cli.format, MatrixFormat::Csv);
    }

    #[test]
    fn test_cli_phase_flags() {
        let cli = Cli::parse_from([
            "keyword_distance",
            "--collect",
            "--collect-secondary",
            "--use-secondary",
            "--fresh",
            "-n",
            "40",
            "-o",
            "/tmp/out",
            "--format",
            "json",
        ]);

        assert!(cli.collect);
        assert!(cli.collect_secondary);
        assert!(cli.use_secondary);
        assert!(cli.fresh);
        assert_eq!(cli.max_results, 40);
        assert_eq!(cli.output_dir, "/tmp/out");
        assert_eq!(cli.format, MatrixFormat::Json);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["keyword_distance", "-k", "/tmp/k.txt", "-s", "/tmp/s.txt"]);

        assert_eq!(cli.keywords, "/tmp/k.txt");
        assert_eq!(cli.stopwords, "/tmp/s.txt");
    }
}
