use crate::model::{ChapterDescriptor, ChapterSeed};
use crate::warning::{ExtractWarning, WarningCode};

/// Chapter start pages of the cancer monograph report.
#[must_use]
pub fn default_chapter_seeds() -> Vec<ChapterSeed> {
    vec![
        ChapterSeed::new(1, "Population and Cancer Incidence", 28),
        ChapterSeed::new(2, "Leading sites of Cancer", 36),
        ChapterSeed::new(3, "Breast Cancer", 54),
        ChapterSeed::new(4, "Cervical Cancer Research", 79),
        ChapterSeed::new(5, "Cancer Research in North-East", 112),
        ChapterSeed::new(6, "Tobacco Related Cancers", 137),
        ChapterSeed::new(7, "Prostrate Cancer", 186),
        ChapterSeed::new(8, "Diet and Cancer", 195),
        ChapterSeed::new(9, "Extramural Research Activities", 201),
    ]
}

/// Each chapter ends on the page before the next one starts; the last
/// chapter ends on the document's last page.
#[must_use]
pub fn build_chapter_map(seeds: &[ChapterSeed], page_count: usize) -> Vec<ChapterDescriptor> {
    seeds
        .iter()
        .enumerate()
        .map(|(index, seed)| {
            let end_page = seeds
                .get(index + 1)
                .map_or(page_count, |next| next.start_page.saturating_sub(1));
            ChapterDescriptor {
                chapter: seed.chapter,
                title: seed.title.clone(),
                start_page: seed.start_page,
                end_page,
            }
        })
        .collect()
}

/// Start pages are trusted but not reordered; out-of-order seeds only warn.
pub(crate) fn check_seed_order(seeds: &[ChapterSeed], warnings: &mut Vec<ExtractWarning>) {
    for pair in seeds.windows(2) {
        if pair[1].start_page <= pair[0].start_page {
            warnings.push(
                ExtractWarning::new(
                    WarningCode::ChapterOrderUnsorted,
                    format!(
                        "chapter {} starts on page {} but chapter {} starts on page {}",
                        pair[1].chapter, pair[1].start_page, pair[0].chapter, pair[0].start_page
                    ),
                )
                .with_chapter(pair[1].chapter),
            );
        }
    }
}
