use crate::dashboard::api::Panel;
use crate::dashboard::treemap_layout;
use crate::models::{BarChart, Treemap, VideoTable, WordCloudImage};
use crate::utils::{format_axis_value, format_number, nice_axis_max};
use web_sys::HtmlInputElement;
use yew::prelude::*;

const CHART_WIDTH: f64 = 560.0;
const CHART_HEIGHT: f64 = 320.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 60.0;
const MARGIN_TOP: f64 = 20.0;
const AXIS_TICKS: usize = 4;

#[derive(Properties, PartialEq)]
pub struct NavbarProps {
    pub title: String,
    pub on: bool,
    pub on_toggle: Callback<bool>,
}

#[function_component(Navbar)]
pub fn navbar(props: &NavbarProps) -> Html {
    let onchange = {
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |e: Event| {
            let checked = e.target_unchecked_into::<HtmlInputElement>().checked();
            on_toggle.emit(checked);
        })
    };

    html! {
        <nav class="flex items-center justify-between bg-gray-800 text-white px-6 py-3 shadow">
            <a href="https://www.youtube.com/" class="flex items-center gap-3">
                <span class="text-red-500 text-2xl">{"▶"}</span>
                <span class="text-xl font-bold">{ props.title.clone() }</span>
            </a>
            <label class="inline-flex items-center gap-2 cursor-pointer">
                <span class="text-sm">{ if props.on { "Power on" } else { "Power off" } }</span>
                <input
                    type="checkbox"
                    class="form-checkbox h-5 w-5 text-teal-600"
                    checked={props.on}
                    {onchange}
                />
            </label>
        </nav>
    }
}

#[derive(Properties, PartialEq)]
struct PanelFrameProps {
    title: String,
    #[prop_or_default]
    children: Html,
}

#[function_component(PanelFrame)]
fn panel_frame(props: &PanelFrameProps) -> Html {
    html! {
        <div class="bg-white rounded-lg shadow p-4">
            <h2 class="text-lg font-semibold text-gray-800 mb-2">{ props.title.clone() }</h2>
            { props.children.clone() }
        </div>
    }
}

fn panel_status<T>(panel: &Panel<T>) -> Option<Html> {
    match panel {
        None => Some(html! { <p class="text-gray-500 text-center">{"Loading..."}</p> }),
        Some(Err(msg)) => Some(html! { <p class="text-red-600 text-center">{ msg.clone() }</p> }),
        Some(Ok(_)) => None,
    }
}

#[derive(Properties, PartialEq)]
pub struct BarChartProps {
    pub title: String,
    pub chart: Panel<BarChart>,
}

#[function_component(BarChartView)]
pub fn bar_chart_view(props: &BarChartProps) -> Html {
    let chart = match &props.chart {
        Some(Ok(chart)) => chart,
        other => {
            return html! {
                <PanelFrame title={props.title.clone()}>{ panel_status(other) }</PanelFrame>
            }
        }
    };

    let plot_width = CHART_WIDTH - MARGIN_LEFT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let max_value = chart
        .series
        .iter()
        .flat_map(|s| s.values.iter().flatten())
        .fold(0.0_f64, |acc, v| acc.max(*v));
    let axis_max = nice_axis_max(max_value);

    let groups = chart.categories.len().max(1) as f64;
    let group_width = plot_width / groups;
    let inner_width = group_width * (1.0 - chart.bar_gap);
    let series_count = chart.series.len().max(1) as f64;
    let bar_width = inner_width / series_count * (1.0 - chart.bar_group_gap);

    let y_of = |value: f64| MARGIN_TOP + plot_height * (1.0 - value / axis_max);

    let ticks = (0..=AXIS_TICKS).map(|i| {
        let value = axis_max * i as f64 / AXIS_TICKS as f64;
        let y = y_of(value);
        html! {
            <g>
                <line x1={MARGIN_LEFT.to_string()} x2={CHART_WIDTH.to_string()}
                      y1={y.to_string()} y2={y.to_string()} stroke="#e5e7eb" />
                <text x={(MARGIN_LEFT - 6.0).to_string()} y={(y + 4.0).to_string()}
                      text-anchor="end" font-size="11" fill="#4b5563">
                    { format_axis_value(value) }
                </text>
            </g>
        }
    });

    let bars = chart.categories.iter().enumerate().map(|(ci, category)| {
        let group_x = MARGIN_LEFT + group_width * ci as f64 + (group_width - inner_width) / 2.0;
        let label_x = MARGIN_LEFT + group_width * (ci as f64 + 0.5);
        let series_bars = chart.series.iter().enumerate().map(|(si, series)| {
            match series.values.get(ci).copied().flatten() {
                Some(value) => {
                    let x = group_x + inner_width / series_count * si as f64;
                    let y = y_of(value);
                    html! {
                        <rect x={x.to_string()} y={y.to_string()}
                              width={bar_width.to_string()}
                              height={(MARGIN_TOP + plot_height - y).max(0.0).to_string()}
                              fill={series.color.clone()}>
                            <title>{ format!("{}: {} ({category})", series.name, format_axis_value(value)) }</title>
                        </rect>
                    }
                }
                None => html! {},
            }
        });
        html! {
            <g>
                { for series_bars }
                <text x={label_x.to_string()} y={(CHART_HEIGHT - MARGIN_BOTTOM + 16.0).to_string()}
                      text-anchor="middle" font-size="11" fill="#374151">
                    { category.clone() }
                </text>
            </g>
        }
    });

    let legend = chart.series.iter().map(|series| {
        html! {
            <span class="inline-flex items-center gap-1 mr-4 text-sm text-gray-700">
                <span class="inline-block w-3 h-3" style={format!("background:{}", series.color)}></span>
                { series.name.clone() }
            </span>
        }
    });

    html! {
        <PanelFrame title={chart.title.clone()}>
            <svg viewBox={format!("0 0 {CHART_WIDTH} {CHART_HEIGHT}")} class="w-full">
                <text x="12" y={(MARGIN_TOP + plot_height / 2.0).to_string()}
                      font-size="12" fill="#374151"
                      transform={format!("rotate(-90 12 {})", MARGIN_TOP + plot_height / 2.0)}
                      text-anchor="middle">
                    { chart.y_axis_title.clone() }
                </text>
                { for ticks }
                { for bars }
            </svg>
            <div class="mt-2">{ for legend }</div>
        </PanelFrame>
    }
}

#[derive(Properties, PartialEq)]
pub struct TreemapProps {
    pub treemap: Panel<Treemap>,
}

#[function_component(TreemapView)]
pub fn treemap_view(props: &TreemapProps) -> Html {
    const TITLE: &str = "Views By Video";
    let treemap = match &props.treemap {
        Some(Ok(treemap)) => treemap,
        other => {
            return html! { <PanelFrame title={TITLE}>{ panel_status(other) }</PanelFrame> }
        }
    };

    let cells = treemap_layout::layout(&treemap.nodes, CHART_WIDTH, CHART_HEIGHT)
        .into_iter()
        .map(|rect| {
            let is_root = rect.node.parent.is_empty();
            html! {
                <g>
                    <rect x={rect.x.to_string()} y={rect.y.to_string()}
                          width={rect.width.to_string()} height={rect.height.to_string()}
                          fill={rect.node.color.clone()}
                          fill-opacity={if is_root { "0.35" } else { "0.9" }}
                          stroke="white" stroke-width={if is_root { "3" } else { "1" }}>
                        <title>{ format!("{}: {} views", rect.node.label, format_number(rect.node.value)) }</title>
                    </rect>
                    if !is_root && rect.height >= 14.0 {
                        <text x={(rect.x + 4.0).to_string()} y={(rect.y + 12.0).to_string()}
                              font-size="10" fill="white">
                            { rect.node.label.clone() }
                        </text>
                    }
                </g>
            }
        });

    html! {
        <PanelFrame title={TITLE}>
            <svg viewBox={format!("0 0 {CHART_WIDTH} {CHART_HEIGHT}")} class="w-full">
                { for cells }
            </svg>
        </PanelFrame>
    }
}

#[derive(Properties, PartialEq)]
pub struct VideoTableProps {
    pub table: Panel<VideoTable>,
}

#[function_component(VideoTableView)]
pub fn video_table_view(props: &VideoTableProps) -> Html {
    let table = match &props.table {
        Some(Ok(table)) => table,
        other => {
            return html! { <PanelFrame title="YouTube Videos">{ panel_status(other) }</PanelFrame> }
        }
    };
    let style = &table.style;

    let header_style = format!(
        "background:{};color:{};position:{};top:0",
        style.header_background,
        style.header_color,
        if style.fixed_header { "sticky" } else { "static" }
    );
    let cell_style = format!(
        "white-space:{};line-height:{}px;text-align:{};min-width:{}px",
        style.white_space, style.line_height_px, style.text_align, style.cell_width_px
    );

    html! {
        <PanelFrame title={table.title.clone()}>
            <div style={format!("max-height:{}px;overflow-y:auto", style.height_px)}>
                <table class="w-full text-sm">
                    <thead>
                        <tr>
                            { for table.columns.iter().map(|c| html! {
                                <th class="px-2 py-1" style={header_style.clone()}>{ c.name.clone() }</th>
                            }) }
                        </tr>
                    </thead>
                    <tbody>
                        { for table.rows.iter().map(|row| html! {
                            <tr class="border-b border-gray-200">
                                <td class="px-2" style={cell_style.clone()}>{ row.channel_title.clone() }</td>
                                <td class="px-2" style={cell_style.clone()}>{ row.channel_video_id.clone() }</td>
                                <td class="px-2" style={cell_style.clone()}>{ row.title.clone() }</td>
                                <td class="px-2" style={cell_style.clone()}>{ format_number(row.view_count) }</td>
                            </tr>
                        }) }
                    </tbody>
                </table>
            </div>
        </PanelFrame>
    }
}

#[derive(Properties, PartialEq)]
pub struct WordCloudProps {
    pub slot: usize,
    pub image: Panel<WordCloudImage>,
}

#[function_component(WordCloudPanel)]
pub fn word_cloud_panel(props: &WordCloudProps) -> Html {
    match &props.image {
        Some(Ok(image)) => html! {
            <PanelFrame title={image.channel.clone()}>
                <img src={image.src.clone()} alt={format!("{} tags", image.channel)} class="w-full" />
            </PanelFrame>
        },
        other => html! {
            <PanelFrame title={format!("Word cloud {}", props.slot)}>{ panel_status(other) }</PanelFrame>
        },
    }
}
