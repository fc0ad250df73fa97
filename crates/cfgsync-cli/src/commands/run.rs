//! Run command implementation.
//!
//! Executes every job of a manifest. A failing job is reported and the
//! remaining jobs still run; the command fails at the end if any job did.

use std::path::Path;

use anyhow::Result;
use cfgsync::{ConfigUpdater, DirectoryResources, UpdateOutcome};
use tracing::{error, info};

use crate::commands::update::describe;
use crate::manifest::{FileJob, Manifest};

/// Execute the run command
pub fn execute(manifest_path: &Path) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    info!(
        manifest = %manifest_path.display(),
        jobs = manifest.files.len(),
        "running manifest"
    );

    let resources = DirectoryResources::new(&manifest.resource_dir);
    let mut failed = 0;
    for job in &manifest.files {
        match run_job(&resources, job) {
            Ok(outcome) => println!("{}: {}", job.target.display(), describe(outcome)),
            Err(err) => {
                error!(target_file = %job.target.display(), error = %err, "job failed");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} jobs failed", failed, manifest.files.len());
    }
    Ok(())
}

fn run_job(resources: &DirectoryResources, job: &FileJob) -> cfgsync::Result<UpdateOutcome> {
    ConfigUpdater::new(resources)
        .ignore_sections(job.ignored_sections.iter().cloned())
        .override_sections(job.override_sections.iter().cloned())
        .create_missing(job.create_missing)
        .update(&job.resource, &job.target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_manifest(temp: &TempDir, body: &str) -> std::path::PathBuf {
        fs::create_dir_all(temp.path().join("defaults")).unwrap();
        fs::write(temp.path().join("defaults/app.yml"), "# Port\nport: 80\nname: app\n").unwrap();
        let path = temp.path().join("cfgsync.toml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_runs_every_job() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("app.yml"), "port: 8080\n").unwrap();
        let manifest = write_manifest(
            &temp,
            "resource_dir = \"defaults\"\n\
             [[file]]\nresource = \"app.yml\"\ntarget = \"app.yml\"\n\
             [[file]]\nresource = \"app.yml\"\ntarget = \"new/app.yml\"\ncreate_missing = true\n",
        );

        execute(&manifest).unwrap();

        assert_eq!(
            fs::read_to_string(temp.path().join("app.yml")).unwrap(),
            "# Port\nport: 8080\nname: app\n"
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("new/app.yml")).unwrap(),
            "# Port\nport: 80\nname: app\n"
        );
    }

    #[test]
    fn test_failure_does_not_stop_other_jobs() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.yml"), "name: mine\n").unwrap();
        let manifest = write_manifest(
            &temp,
            "resource_dir = \"defaults\"\n\
             [[file]]\nresource = \"app.yml\"\ntarget = \"missing.yml\"\n\
             [[file]]\nresource = \"app.yml\"\ntarget = \"b.yml\"\n",
        );

        assert!(execute(&manifest).is_err());
        assert_eq!(
            fs::read_to_string(temp.path().join("b.yml")).unwrap(),
            "# Port\nport: 80\nname: mine\n"
        );
    }
}
