//! All masters of a Designspace as one kerning table.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use norad::designspace;
use rayon::prelude::*;

use crate::error::Error;
use crate::norad_interop::{
    ufo_is_valid_key, ufo_pairs, ufo_remove_pair, ufo_set_value, units_per_em,
    FALLBACK_UNITS_PER_EM,
};
use crate::table::{KerningEntry, KerningTable};

/// A full master source and the UFO it points to.
#[derive(Debug)]
pub struct Master {
    /// The source name, used as the kerning context.
    pub name: String,
    pub path: PathBuf,
    pub font: norad::Font,
}

/// The masters of a Designspace. Sparse layer sources carry no kerning and
/// are left out.
#[derive(Debug)]
pub struct DesignspaceFont {
    masters: Vec<Master>,
}

impl DesignspaceFont {
    pub fn load(designspace_path: &Path) -> Result<Self, Error> {
        let document = designspace::DesignSpaceDocument::load(designspace_path).map_err(|e| {
            Error::LoadDesignspace {
                path: designspace_path.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        let designspace_dir = designspace_path.parent().unwrap_or_else(|| Path::new(""));

        let masters = document
            .sources
            .par_iter()
            .filter(|source| source.layer.is_none())
            .map(|source| {
                let path = designspace_dir.join(&source.filename);
                let font = norad::Font::load(&path).map_err(|e| Error::LoadUfo {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                Ok(Master {
                    name: source.name.clone(),
                    path,
                    font,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;
        log::debug!(
            "Loaded {} masters from {}",
            masters.len(),
            designspace_path.display()
        );

        Self::from_masters(masters)
    }

    /// Assemble from already loaded masters; source names must be unique.
    pub fn from_masters(masters: Vec<Master>) -> Result<Self, Error> {
        let mut seen = HashSet::new();
        for master in &masters {
            if !seen.insert(master.name.as_str()) {
                return Err(Error::DuplicateSource(master.name.clone()));
            }
        }
        Ok(Self { masters })
    }

    /// Write every UFO back to where it was loaded from.
    ///
    /// Takes `&mut self` because `norad::Font` is not `Sync`; each UFO is
    /// handed to exactly one worker.
    pub fn save(&mut self) -> Result<(), Error> {
        self.masters
            .par_iter_mut()
            .try_for_each(|master| save_master(master))
    }

    fn master(&self, context: &str) -> Option<&Master> {
        self.masters.iter().find(|m| m.name == context)
    }

    fn master_mut(&mut self, context: &str) -> Option<&mut Master> {
        self.masters.iter_mut().find(|m| m.name == context)
    }
}

/// Save the UFO, but preserve the metainfo.plist, because it's uninteresting
/// and changing it increases git noise.
fn save_master(master: &Master) -> Result<(), Error> {
    let save_error = |message: String| Error::SaveUfo {
        path: master.path.clone(),
        message,
    };
    let metainfo_path = master.path.join("metainfo.plist");
    let metainfo = fs::read(&metainfo_path).ok();
    master
        .font
        .save(&master.path)
        .map_err(|e| save_error(e.to_string()))?;
    if let Some(metainfo) = metainfo {
        fs::write(&metainfo_path, metainfo).map_err(|e| save_error(e.to_string()))?;
    }
    Ok(())
}

impl KerningTable for DesignspaceFont {
    fn units_per_em(&self) -> u32 {
        self.masters
            .iter()
            .find_map(|m| units_per_em(&m.font))
            .unwrap_or(FALLBACK_UNITS_PER_EM)
    }

    fn contexts(&self) -> Vec<String> {
        self.masters.iter().map(|m| m.name.clone()).collect()
    }

    fn pairs(&self, context: &str) -> Vec<KerningEntry> {
        self.master(context)
            .map(|m| ufo_pairs(&m.font, context))
            .unwrap_or_default()
    }

    fn is_valid_key(&self, context: &str, key: &str) -> bool {
        self.master(context)
            .map(|m| ufo_is_valid_key(&m.font, key))
            .unwrap_or(false)
    }

    fn set_value(&mut self, context: &str, left: &str, right: &str, value: i64) {
        match self.master_mut(context) {
            Some(master) => ufo_set_value(&mut master.font, left, right, value),
            None => log::warn!("No master named '{context}', cannot kern {left}/{right}"),
        }
    }

    fn remove_pair(&mut self, context: &str, left: &str, right: &str) {
        if let Some(master) = self.master_mut(context) {
            ufo_remove_pair(&mut master.font, left, right);
        }
    }
}
