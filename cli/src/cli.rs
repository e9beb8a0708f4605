use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "relkit")]
#[command(
    author,
    version,
    about = "CLI toolkit that automates software-release chores"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run release chores for a project directory
    Release(ReleaseArgs),

    /// Manage per-interpreter conda/mamba environments
    Envs {
        /// Action to perform on the environments
        #[clap(subcommand)]
        action: EnvsAction,
    },

    /// Build (and optionally upload) a package across Python versions and platforms
    Docker {
        /// Name of the package
        package: String,

        /// Minimum Python version, in the form X.Y
        min_version: String,

        /// Maximum Python version, in the form X.Y
        max_version: String,

        /// Path to the package directory
        path: PathBuf,

        /// Upload the built distributions with twine
        #[clap(short, long, default_value_t = false)]
        upload: bool,
    },
}

#[derive(Args, Clone, Debug)]
pub struct ReleaseArgs {
    /// Project directory to release
    pub directory: PathBuf,

    /// Version number being released
    pub version: String,

    /// Merge pending news fragments into the changelog
    #[clap(long, default_value_t = false)]
    pub changelog: bool,

    /// Create a version tag and push it to the upstream remote
    #[clap(long, default_value_t = false)]
    pub tag: bool,

    /// Create a GitHub release with a source tarball
    #[clap(long, default_value_t = false)]
    pub github: bool,

    /// Build and upload a distribution to PyPI
    #[clap(long, default_value_t = false)]
    pub pypi: bool,

    /// Name of the changelog file
    #[clap(long, value_name = "FILENAME")]
    pub cl_file: Option<String>,

    /// Location of the news directory, relative to the project directory
    #[clap(long, value_name = "NEWSDIR")]
    pub cl_news: Option<String>,

    /// Name of the fragment template file
    #[clap(long, value_name = "TEMPLATE")]
    pub cl_template: Option<String>,

    /// Comma-separated list of changelog categories
    #[clap(long, value_name = "CATLIST")]
    pub cl_categories: Option<String>,

    /// Comma-separated list of news files to leave untouched
    #[clap(long, value_name = "FILELIST")]
    pub cl_ignore: Option<String>,

    /// Anchor line after which new sections are inserted
    #[clap(long, value_name = "ANCHOR")]
    pub cl_anchor: Option<String>,

    /// Title of the GitHub release (defaults to the version)
    #[clap(long, value_name = "TITLE")]
    pub gh_title: Option<String>,

    /// Notes for the GitHub release (defaults to generated notes)
    #[clap(long, value_name = "NOTES")]
    pub gh_notes: Option<String>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum EnvsAction {
    /// Create one environment per interpreter version
    Create {
        /// Comma-separated interpreter versions, e.g. "3.10, 3.11, 3.12"
        versions: String,

        #[clap(flatten)]
        opts: EnvsOpts,

        /// File of conda/mamba requirements to install in each environment
        #[clap(short, long, value_name = "REQFILE")]
        requirements: Option<String>,

        /// File of pip requirements to install in each environment
        #[clap(long, value_name = "PREQFILE")]
        pip_requirements: Option<String>,

        /// Install the given directory in developer mode in each environment
        #[clap(short, long, value_name = "DEVDIR")]
        dev_mode: Option<PathBuf>,

        /// Create a directory of version-named symlinks to each interpreter
        #[clap(long, value_name = "NESTDIR")]
        nest: Option<PathBuf>,
    },

    /// Remove the environments for the given versions
    Clean {
        /// Comma-separated interpreter versions, e.g. "3.10, 3.11, 3.12"
        versions: String,

        #[clap(flatten)]
        opts: EnvsOpts,
    },

    /// Run a script line by line inside each environment
    Run {
        /// Comma-separated interpreter versions, e.g. "3.10, 3.11, 3.12"
        versions: String,

        #[clap(flatten)]
        opts: EnvsOpts,

        /// Script file; occurrences of [vsn] are replaced with each version
        #[clap(long, value_name = "SCRIPTFILE")]
        script: PathBuf,
    },
}

#[derive(Args, Clone, Debug)]
pub struct EnvsOpts {
    /// Use mamba instead of conda
    #[clap(short, long, default_value_t = false)]
    pub mamba: bool,

    /// Environment name prefix; environments are named <prefix><version><suffix>
    #[clap(short, long, default_value = "py-")]
    pub prefix: String,

    /// Environment name suffix; environments are named <prefix><version><suffix>
    #[clap(short, long, default_value = "-env")]
    pub suffix: String,

    /// Treat requirement paths as version-specific [vsn] patterns
    #[clap(long, default_value_t = false)]
    pub vreqs: bool,
}
