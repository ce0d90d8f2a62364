// ─────────────────────────────────────────────────────────────────────
// Kleopatra Orbit Search — Result Archive
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! NumPy `.npz` archive of a search run.
//!
//! Entries: `x0_axis`, `C_axis` (1-D), `x0`, `C`, `dy0`, `dxt` (2-D f64) and
//! `status` (2-D i32, [`CellStatus::code`]).

use crate::search::SearchOutcome;
use kleo_types::error::{KleoError, KleoResult};
use kleo_types::state::CellStatus;
use ndarray::{Array1, Array2, Ix1, Ix2, OwnedRepr};
use ndarray_npy::{NpzReader, NpzWriter, ReadableElement};
use std::fs::File;
use std::path::Path;

/// Arrays read back from a search archive.
#[derive(Debug, Clone)]
pub struct SearchArchive {
    pub x0_axis: Array1<f64>,
    pub c_axis: Array1<f64>,
    pub x0: Array2<f64>,
    pub c: Array2<f64>,
    pub dy0: Array2<f64>,
    pub dxt: Array2<f64>,
    pub status: Array2<CellStatus>,
}

/// Write `outcome` to `path`, replacing any existing file.
pub fn save_npz<P: AsRef<Path>>(outcome: &SearchOutcome, path: P) -> KleoResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut npz = NpzWriter::new(file);
    let grid = &outcome.grid;
    let status = outcome.processed.status.mapv(CellStatus::code);

    let npz_err = |key: &str, e: ndarray_npy::WriteNpzError| {
        KleoError::Npz(format!("failed to write {key} to '{}': {e}", path.display()))
    };
    npz.add_array("x0_axis", &grid.x0_axis)
        .map_err(|e| npz_err("x0_axis", e))?;
    npz.add_array("C_axis", &grid.c_axis)
        .map_err(|e| npz_err("C_axis", e))?;
    npz.add_array("x0", &grid.x0).map_err(|e| npz_err("x0", e))?;
    npz.add_array("C", &grid.c).map_err(|e| npz_err("C", e))?;
    npz.add_array("dy0", &grid.dy0).map_err(|e| npz_err("dy0", e))?;
    npz.add_array("dxt", &outcome.processed.dxt)
        .map_err(|e| npz_err("dxt", e))?;
    npz.add_array("status", &status)
        .map_err(|e| npz_err("status", e))?;
    npz.finish().map_err(|e| npz_err("archive", e))?;

    log::debug!("search '{}' saved to {}", outcome.name, path.display());
    Ok(())
}

/// Read an archive written by [`save_npz`].
pub fn load_npz<P: AsRef<Path>>(path: P) -> KleoResult<SearchArchive> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut npz = NpzReader::new(file)
        .map_err(|e| KleoError::Npz(format!("failed to open '{}': {e}", path.display())))?;

    let x0 = read_array::<f64, Ix2>(&mut npz, "x0")?;
    let codes = read_array::<i32, Ix2>(&mut npz, "status")?;
    if codes.dim() != x0.dim() {
        return Err(KleoError::ShapeMismatch {
            expected: x0.shape().to_vec(),
            actual: codes.shape().to_vec(),
        });
    }
    let mut status = Array2::from_elem(codes.raw_dim(), CellStatus::default());
    for (out, &code) in status.iter_mut().zip(codes.iter()) {
        *out = CellStatus::from_code(code)
            .ok_or_else(|| KleoError::Npz(format!("unknown cell status code {code}")))?;
    }

    Ok(SearchArchive {
        x0_axis: read_array::<f64, Ix1>(&mut npz, "x0_axis")?,
        c_axis: read_array::<f64, Ix1>(&mut npz, "C_axis")?,
        c: read_array::<f64, Ix2>(&mut npz, "C")?,
        dy0: read_array::<f64, Ix2>(&mut npz, "dy0")?,
        dxt: read_array::<f64, Ix2>(&mut npz, "dxt")?,
        x0,
        status,
    })
}

fn read_array<T, D>(
    npz: &mut NpzReader<File>,
    key: &str,
) -> KleoResult<ndarray::ArrayBase<OwnedRepr<T>, D>>
where
    T: ReadableElement,
    D: ndarray::Dimension,
{
    npz.by_name::<OwnedRepr<T>, D>(&format!("{key}.npy"))
        .or_else(|_| npz.by_name::<OwnedRepr<T>, D>(key))
        .map_err(|e| KleoError::Npz(format!("failed to read {key} from npz: {e}")))
}
