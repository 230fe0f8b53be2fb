use crate::chart::{self, format_grouped, ChartSpec, Viewport};
use crate::models::{Bar, Dataset, Measure, Record, SceneDescriptor, SummaryResponse};

/// Country scenes plot the leading entries, not the whole dataset.
pub const TOP_N: usize = 20;

/// One step of the narrative: a stable identifier, captions, and a derivation
/// from the shared dataset to chart rows. A single dispatcher runs
/// derive-then-draw for every scene.
pub struct Scene {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub x_title: &'static str,
    pub measure: Measure,
    pub interactive: bool,
    pub annotated: bool,
    derive: fn(&Dataset) -> Vec<Bar>,
}

pub const SCENES: &[Scene] = &[
    Scene {
        id: "top-cases",
        title: "Hardest-hit countries",
        subtitle: "The 20 countries with the most confirmed cases.",
        x_title: "Country",
        measure: Measure::Cases,
        interactive: false,
        annotated: true,
        derive: derive_top_cases,
    },
    Scene {
        id: "top-deaths",
        title: "Deaths by country",
        subtitle: "The same 20-country view, ranked by deaths instead.",
        x_title: "Country",
        measure: Measure::Deaths,
        interactive: false,
        annotated: true,
        derive: derive_top_deaths,
    },
    Scene {
        id: "cases-by-region",
        title: "Cases by region",
        subtitle: "Every country's cases summed into its region.",
        x_title: "Region",
        measure: Measure::Cases,
        interactive: false,
        annotated: true,
        derive: derive_region_cases,
    },
    Scene {
        id: "deaths-by-region",
        title: "Deaths by region",
        subtitle: "Regional death tolls, summed the same way.",
        x_title: "Region",
        measure: Measure::Deaths,
        interactive: false,
        annotated: true,
        derive: derive_region_deaths,
    },
    Scene {
        id: "explore",
        title: "Explore the data",
        subtitle: "Hover a bar to see both measures for that country.",
        x_title: "Country",
        measure: Measure::Cases,
        interactive: true,
        annotated: false,
        derive: derive_explore,
    },
];

pub fn find(id: &str) -> Option<&'static Scene> {
    SCENES.iter().find(|scene| scene.id == id)
}

/// Derive rows from the dataset, then draw them for the viewport. Stateless:
/// calling twice with the same inputs yields identical markup.
pub fn render(scene: &Scene, dataset: &Dataset, viewport: Viewport) -> String {
    let bars = (scene.derive)(dataset);
    chart::render_bar_chart(
        &bars,
        viewport,
        &ChartSpec {
            x_title: scene.x_title,
            y_title: scene.measure.label(),
            annotate_max: scene.annotated,
        },
    )
}

pub fn descriptors() -> Vec<SceneDescriptor> {
    SCENES
        .iter()
        .map(|scene| SceneDescriptor {
            id: scene.id,
            title: scene.title,
            interactive: scene.interactive,
            annotated: scene.annotated,
        })
        .collect()
}

pub fn summary(dataset: &Dataset) -> SummaryResponse {
    let mut regions: Vec<&str> = Vec::new();
    for record in &dataset.records {
        if !regions.contains(&record.region.as_str()) {
            regions.push(&record.region);
        }
    }
    SummaryResponse {
        records: dataset.len(),
        regions: regions.len(),
        total_cases: dataset.records.iter().map(|r| r.total_cases).sum(),
        total_deaths: dataset.records.iter().map(|r| r.total_deaths).sum(),
    }
}

/// Top `limit` countries by one measure, descending. Order across equal
/// values is not guaranteed (unstable sort).
pub fn top_countries(dataset: &Dataset, measure: Measure, limit: usize) -> Vec<Bar> {
    let mut records: Vec<&Record> = dataset.records.iter().collect();
    records.sort_unstable_by(|a, b| measure.of(b).cmp(&measure.of(a)));
    records.truncate(limit);
    records
        .into_iter()
        .map(|record| Bar {
            label: record.country.clone(),
            value: measure.of(record),
            tip: None,
        })
        .collect()
}

/// Per-region sums of one measure. Partitions accumulate in first-seen order,
/// then sort descending by value; ties keep first-seen order (stable sort).
pub fn region_totals(dataset: &Dataset, measure: Measure) -> Vec<Bar> {
    let mut totals: Vec<(String, u64)> = Vec::new();
    for record in &dataset.records {
        match totals.iter_mut().find(|(region, _)| *region == record.region) {
            Some((_, sum)) => *sum += measure.of(record),
            None => totals.push((record.region.clone(), measure.of(record))),
        }
    }
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
        .into_iter()
        .map(|(label, value)| Bar {
            label,
            value,
            tip: None,
        })
        .collect()
}

fn derive_top_cases(dataset: &Dataset) -> Vec<Bar> {
    top_countries(dataset, Measure::Cases, TOP_N)
}

fn derive_top_deaths(dataset: &Dataset) -> Vec<Bar> {
    top_countries(dataset, Measure::Deaths, TOP_N)
}

fn derive_region_cases(dataset: &Dataset) -> Vec<Bar> {
    region_totals(dataset, Measure::Cases)
}

fn derive_region_deaths(dataset: &Dataset) -> Vec<Bar> {
    region_totals(dataset, Measure::Deaths)
}

fn derive_explore(dataset: &Dataset) -> Vec<Bar> {
    let mut bars = top_countries(dataset, Measure::Cases, TOP_N);
    for bar in &mut bars {
        if let Some(record) = dataset.records.iter().find(|r| r.country == bar.label) {
            bar.tip = Some(format!(
                "Cases: {}, Deaths: {}",
                format_grouped(record.total_cases),
                format_grouped(record.total_deaths)
            ));
        }
    }
    bars
}
