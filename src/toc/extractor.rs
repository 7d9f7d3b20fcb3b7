use tracing::debug;

use crate::model::TocItem;
use crate::toc::title_features::TitleFeatures;

struct OpenItem {
    indentation: u32,
    point_closed: bool,
}

pub fn build_toc(titles: &[TitleFeatures]) -> Vec<TocItem> {
    let mut levels: Vec<OpenItem> = Vec::with_capacity(titles.len());

    for (title_index, title) in titles.iter().enumerate() {
        let indentation = indentation_for(titles, &mut levels, title_index, title);
        debug!(indentation, label = %title.text_content, "placed title");
        levels.push(OpenItem {
            indentation,
            point_closed: false,
        });
    }

    titles
        .iter()
        .zip(&levels)
        .map(|(title, level)| title.to_toc_item(level.indentation))
        .collect()
}

fn indentation_for(
    titles: &[TitleFeatures],
    levels: &mut [OpenItem],
    title_index: usize,
    title: &TitleFeatures,
) -> u32 {
    let Some(previous) = levels.last() else {
        return 0;
    };
    let child_indentation = previous.indentation + 1;

    let previous_points = title.possible_previous_point();
    for index in (0..title_index).rev() {
        if levels[index].point_closed {
            continue;
        }

        if same_indentation(&titles[index], title, &previous_points) {
            let indentation = levels[index].indentation;
            close_toc_items(levels, indentation);
            return indentation;
        }
    }

    child_indentation
}

fn close_toc_items(levels: &mut [OpenItem], indentation: u32) {
    for level in levels.iter_mut().filter(|level| level.indentation > indentation) {
        level.point_closed = true;
    }
}

fn same_indentation(
    previous_title: &TitleFeatures,
    title: &TitleFeatures,
    previous_points: &[String],
) -> bool {
    if previous_points.contains(&previous_title.first_characters) {
        return true;
    }

    previous_title.style_key() == title.style_key()
}
