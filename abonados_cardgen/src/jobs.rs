use std::fs;
use std::path::{Path, PathBuf};

use abonados_barcode::{
    describe_barcode, generate_barcode_with_options, pseudo_qr, RasterImage, RasterOptions,
};
use tracing::{debug, error, info};

use crate::config::{Config, JobConfig};
use crate::errors::JobError;


fn render_image(job: &JobConfig, raster: &RasterOptions) -> Result<RasterImage, JobError> {
    match job {
        JobConfig::Barcode { data, symbology, width, height, .. } => {
            debug!("{}", describe_barcode(data, symbology.name()));
            generate_barcode_with_options(data, *width, *height, *symbology, raster)
                .ok_or(JobError::NotRenderable)
        },
        JobConfig::PseudoQr { data, size, .. } => {
            pseudo_qr::rasterize_pseudo_qr(data, *size, raster)
                .map_err(|e| JobError::Bitmap(e))
        },
    }
}

/// Renders a job into PNG bytes.
pub(crate) fn render_job(job: &JobConfig, raster: &RasterOptions) -> Result<Vec<u8>, JobError> {
    let image = render_image(job, raster)?;
    debug!("rendered {}x{} px at {} dpi", image.width(), image.height(), image.dpi());
    image.to_png()
        .map_err(|e| JobError::Bitmap(e))
}

fn write_output(output_dir: &Path, file: &Path, png: &[u8]) -> Result<PathBuf, JobError> {
    let path = output_dir.join(file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| JobError::CreatingDirectory(parent.to_owned(), e))?;
    }
    fs::write(&path, png)
        .map_err(|e| JobError::Writing(path.clone(), e))?;
    Ok(path)
}

/// Runs all jobs, skipping those that fail. Returns the number of failed jobs.
pub(crate) fn run_jobs(config: &Config) -> usize {
    let mut failed = 0;
    for (index, job) in config.jobs.iter().enumerate() {
        let result = render_job(job, &config.raster)
            .and_then(|png| write_output(&config.output_dir, job.file(), &png));
        match result {
            Ok(path) => info!("job {}: wrote {}", index, path.display()),
            Err(e) => {
                error!("job {} ({}): {}", index, job.file().display(), e);
                failed += 1;
            },
        }
    }
    failed
}
