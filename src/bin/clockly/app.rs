//! clockly - command runners

use color_eyre::eyre::{bail, eyre, Result as EyreResult, WrapErr};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::{path::Path, sync::Arc, thread, time::Duration};
use tracing::info;

use clockly_tones::{
    backend::{CpalHost, OfflineHost},
    AppConfig, Catalog, ToneSequencer,
};

/// Time for a fresh output stream to start before the first tone is due.
const STREAM_STARTUP: Duration = Duration::from_millis(150);

pub struct Clockly {
    config: AppConfig,
    catalog: Arc<Catalog>,
}

impl Clockly {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            catalog: Arc::new(Catalog::builtin()),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Sequencer playing through the configured output hosts.
    pub fn live_sequencer(&self) -> EyreResult<ToneSequencer<CpalHost>> {
        let host = CpalHost::from_config(&self.config.audio);
        ToneSequencer::new(Arc::clone(&self.catalog), host)
            .with_shape(self.config.voicing)
            .wrap_err("invalid voicing")
    }

    fn tail(&self) -> Duration {
        Duration::from_millis(u64::from(self.config.audio.tail_ms))
    }

    pub fn list(&self, categories: bool) {
        if !categories {
            for name in self.catalog.names() {
                println!("{name}");
            }
            return;
        }

        for category in self.catalog.categories() {
            println!("{}:", category.name);
            for sound in &category.sounds {
                println!("  {sound}");
            }
        }

        let loose: Vec<&str> = self
            .catalog
            .names()
            .filter(|name| self.catalog.category_of(name).is_none())
            .collect();
        if !loose.is_empty() {
            println!("Other:");
            for name in loose {
                println!("  {name}");
            }
        }
    }

    pub fn play(&self, name: &str) -> EyreResult<()> {
        let sequencer = self.live_sequencer()?;
        if !sequencer.play_sound(name) {
            bail!(
                "unknown sound '{name}' (available: {})",
                sequencer.list_sounds().join(", ")
            );
        }

        // play_sound only schedules; keep the process alive while it sounds
        let duration = sequencer
            .sound(name)
            .map(|sound| sound.duration())
            .unwrap_or_default();
        thread::sleep(
            STREAM_STARTUP
                .saturating_add(duration)
                .saturating_add(self.tail()),
        );
        Ok(())
    }

    /// Render `name` offline at the configured sample rate.
    pub fn render_samples(&self, name: &str) -> EyreResult<Vec<f32>> {
        let host = OfflineHost::new(self.config.audio.sample_rate as f32)
            .with_tail(self.tail().as_secs_f64());
        let sequencer = ToneSequencer::new(Arc::clone(&self.catalog), host.clone())
            .with_shape(self.config.voicing)
            .wrap_err("invalid voicing")?;

        let sound = sequencer
            .sound(name)
            .ok_or_else(|| eyre!("unknown sound '{name}'"))?;
        sequencer
            .try_render_sequence(sound.segments())
            .wrap_err_with(|| format!("failed to render '{name}'"))?;

        host.take_renders()
            .pop()
            .ok_or_else(|| eyre!("render of '{name}' produced no session"))
    }

    pub fn render(&self, name: &str, out: &Path) -> EyreResult<()> {
        let samples = self.render_samples(name)?;
        let sample_rate = self.config.audio.sample_rate;

        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(out, spec)
            .wrap_err_with(|| format!("failed to create {}", out.display()))?;
        for &s in &samples {
            let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(v)?;
        }
        writer.finalize()?;

        info!(
            sound = name,
            frames = samples.len(),
            sample_rate,
            path = %out.display(),
            "wrote wav"
        );
        Ok(())
    }

    pub fn info(&self) {
        let meta = self.catalog.metadata();
        println!("{}", meta.description);
        println!("  kind:        {}", meta.kind);
        println!("  method:      {}", meta.method);
        println!("  license:     {}", meta.license);
        println!(
            "  attribution: {}",
            if meta.attribution_required {
                "required"
            } else {
                "not required"
            }
        );
        println!("  sounds:      {}", self.catalog.len());
        println!("  categories:  {}", self.catalog.categories().len());
    }

    pub fn run_ui(&self) -> EyreResult<()> {
        let mut app = crate::ui::UiApp::new(self)?;
        let mut terminal = ratatui::init();
        let res = app.run(&mut terminal);
        ratatui::restore();
        res
    }
}
