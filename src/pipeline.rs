use std::path::PathBuf;
use std::time::Instant;

use crate::assembler::assemble;
use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::core::model::InspectionRecord;
use crate::core::validate::parse_record;
use crate::export::{render_pdf, Exporter, HtmlDebugExporter, PlanJsonExporter};
use crate::imaging::{
    AssetKind, AssetStore, CompressionProfile, ImageCache, PreprocessReport, RenderResources,
};
use crate::layout::page::DocumentPlan;

/// Optional side outputs written from the same plan and images as the PDF.
#[derive(Debug, Clone, Default)]
pub struct DebugOutputs {
    pub plan_json: Option<PathBuf>,
    pub html_dir: Option<PathBuf>,
}

impl DebugOutputs {
    fn exporters(&self) -> Vec<Box<dyn Exporter>> {
        let mut exporters: Vec<Box<dyn Exporter>> = Vec::new();
        if let Some(path) = &self.plan_json {
            exporters.push(Box::new(PlanJsonExporter::new(path.clone())));
        }
        if let Some(dir) = &self.html_dir {
            exporters.push(Box::new(HtmlDebugExporter::new(dir.clone())));
        }
        exporters
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub bytes: Vec<u8>,
    pub plan: DocumentPlan,
    pub report: PreprocessReport,
    pub missing_assets: Vec<AssetKind>,
}

impl GeneratedDocument {
    pub fn page_count(&self) -> usize {
        self.plan.page_count()
    }
}

/// Compresses every photo of the record and loads the template assets. The
/// result belongs to this one call.
pub fn prepare(record: &InspectionRecord, config: &EngineConfig) -> Result<RenderResources> {
    config.validate()?;
    let profile = CompressionProfile::from_config(config);
    let images = ImageCache::build(record, profile, config.workers)?;
    let assets = AssetStore::load(&config.asset_dir, profile);
    Ok(RenderResources::new(images, assets))
}

pub fn generate(record: &InspectionRecord, config: &EngineConfig) -> Result<GeneratedDocument> {
    generate_with_outputs(record, config, &DebugOutputs::default())
}

pub fn generate_with_outputs(
    record: &InspectionRecord,
    config: &EngineConfig,
    outputs: &DebugOutputs,
) -> Result<GeneratedDocument> {
    let started = Instant::now();
    let resources = prepare(record, config)?;
    let plan = assemble(record, &resources, config);
    let bytes = render_pdf(&plan, &resources)?;

    for exporter in outputs.exporters() {
        exporter.export(&plan, &resources)?;
    }

    log::info!(
        "generated {} for {}: {} pages, {} bytes in {:?}",
        plan.title,
        record.job_reference,
        plan.page_count(),
        bytes.len(),
        started.elapsed()
    );
    Ok(GeneratedDocument {
        bytes,
        plan,
        report: resources.images.report().clone(),
        missing_assets: resources.assets.missing().to_vec(),
    })
}

pub fn generate_from_json(json: &str, config: &EngineConfig) -> Result<GeneratedDocument> {
    let record = parse_record(json)?;
    generate(&record, config)
}
