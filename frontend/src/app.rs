use crate::components::page_header::PageHeader;
use crate::theme::{load_preference, save_preference, Theme};
use yew::{html, Component, Context, Html};

pub enum Msg {
    ToggleTheme,
}

pub struct App {
    theme: Theme,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            theme: load_preference(),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::ToggleTheme => {
                self.theme = self.theme.toggled();
                save_preference(self.theme);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let toggle = ctx.link().callback(|_| Msg::ToggleTheme);

        html! {
            <div class={self.theme.class()}>
                <PageHeader title="Recipebox" subtitle="Share what you cook" theme={self.theme}>
                    <button class="page-header__toggle" onclick={toggle}>
                        { self.theme.toggle_label() }
                    </button>
                </PageHeader>
            </div>
        }
    }
}
