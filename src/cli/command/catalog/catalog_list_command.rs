use crate::catalog;
use crate::cli::InvokeContext;
use crate::cli::to_args::ToArgs;
use arbitrary::Arbitrary;
use clap::Args;
use std::ffi::OsString;

#[derive(Args, Arbitrary, Clone, PartialEq, Debug)]
pub struct CatalogListArgs {
    /// Only list images of this keyword
    #[clap(long)]
    #[arbitrary(value = None)]
    pub keyword: Option<String>,

    /// Print full paths instead of `keyword/filename`
    #[clap(long)]
    pub paths: bool,
}

impl CatalogListArgs {
    /// # Errors
    ///
    /// Returns an error if the config cannot be loaded or the keyword directory cannot be read.
    pub fn invoke(self, context: &InvokeContext) -> eyre::Result<()> {
        let config = context.load_config()?.randimg;
        let basedir = catalog::absolute_basedir(&config.basedir)?;

        let entries = match &self.keyword {
            Some(keyword) => catalog::list_keyword(&basedir, keyword)?,
            None => catalog::list_all(&basedir, &config.keywords),
        };
        for entry in &entries {
            if self.paths {
                println!("{}", entry.path(&basedir).display());
            } else {
                println!("{}/{}", entry.keyword, entry.filename);
            }
        }
        if entries.is_empty() {
            println!("No images found under {}", basedir.display());
        }
        Ok(())
    }
}

impl ToArgs for CatalogListArgs {
    fn to_args(&self) -> Vec<OsString> {
        let mut rtn = vec![];
        if let Some(keyword) = &self.keyword {
            rtn.push(OsString::from("--keyword"));
            rtn.push(OsString::from(keyword));
        }
        if self.paths {
            rtn.push(OsString::from("--paths"));
        }
        rtn
    }
}
