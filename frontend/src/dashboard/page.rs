use crate::dashboard::api::{
    load_bar_chart, load_treemap, load_video_table, load_wordcloud, Panel, RequestGeneration,
    WORDCLOUD_SLOTS,
};
use crate::dashboard::components::{
    BarChartView, Navbar, TreemapView, VideoTableView, WordCloudPanel,
};
use crate::env_variable_utils::get_app_name;
use crate::models::{BarChart, Treemap, VideoTable, WordCloudImage};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let on = use_state(|| true);
    let generation = use_mut_ref(|| 0_u64);

    let average_views = use_state(|| None::<Result<BarChart, String>>);
    let quality = use_state(|| None::<Result<BarChart, String>>);
    let engagement = use_state(|| None::<Result<BarChart, String>>);
    let treemap = use_state(|| None::<Result<Treemap, String>>);
    let videos = use_state(|| None::<Result<VideoTable, String>>);
    // Hooks must not be called in a loop; one handle per slot.
    let clouds: [UseStateHandle<Panel<WordCloudImage>>; WORDCLOUD_SLOTS] = [
        use_state(|| None),
        use_state(|| None),
        use_state(|| None),
        use_state(|| None),
        use_state(|| None),
    ];

    // Every toggle change re-requests all panels.
    {
        let average_views = average_views.clone();
        let quality = quality.clone();
        let engagement = engagement.clone();
        let treemap = treemap.clone();
        let videos = videos.clone();
        let clouds = clouds.clone();
        let generation = generation.clone();

        use_effect_with(*on, move |on| {
            let on = *on;
            let current = RequestGeneration::next(&generation);
            spawn_local(load_bar_chart("average-views", on, current.clone(), average_views));
            spawn_local(load_bar_chart("quality-rating", on, current.clone(), quality));
            spawn_local(load_bar_chart("engagement-rating", on, current.clone(), engagement));
            spawn_local(load_treemap(on, current.clone(), treemap));
            spawn_local(load_video_table(on, current.clone(), videos));
            for (i, cloud) in clouds.into_iter().enumerate() {
                spawn_local(load_wordcloud(i + 1, on, current.clone(), cloud));
            }
            || ()
        });
    }

    let on_toggle = {
        let on = on.clone();
        Callback::from(move |checked: bool| on.set(checked))
    };

    html! {
        <div class="min-h-screen bg-gray-100">
            <Navbar title={get_app_name()} on={*on} {on_toggle} />
            <main class="p-4 space-y-4">
                <div class="grid grid-cols-1 lg:grid-cols-2 gap-4">
                    <BarChartView title="Average Daily Views Count By Channel" chart={(*average_views).clone()} />
                    <TreemapView treemap={(*treemap).clone()} />
                    <BarChartView title="Content Quality Rating" chart={(*quality).clone()} />
                    <BarChartView title="Audience Engagement Rating" chart={(*engagement).clone()} />
                </div>
                <VideoTableView table={(*videos).clone()} />
                <div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-5 gap-4">
                    { for clouds.iter().enumerate().map(|(i, cloud)| html! {
                        <WordCloudPanel slot={i + 1} image={(**cloud).clone()} />
                    }) }
                </div>
            </main>
        </div>
    }
}
