//! Top-of-page header bar.
//!
//! Rendering depends only on the props: the title, an optional subtitle,
//! the theme passed in by the parent, and any action buttons given as
//! children.

use crate::theme::Theme;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct PageHeaderProps {
    pub title: AttrValue,
    pub theme: Theme,
    #[prop_or_default]
    pub subtitle: Option<AttrValue>,
    /// Action buttons rendered on the right-hand side.
    #[prop_or_default]
    pub children: Children,
}

/// Class set for the header element.
pub fn header_classes(theme: Theme, has_actions: bool) -> Classes {
    let mut classes = classes!("page-header", theme.class());
    if has_actions {
        classes.push("page-header--with-actions");
    }
    classes
}

pub struct PageHeader;

impl Component for PageHeader {
    type Message = ();
    type Properties = PageHeaderProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let has_actions = !props.children.is_empty();

        html! {
            <header class={header_classes(props.theme, has_actions)}>
                <div class="page-header__titles">
                    <h1 class="page-header__title">{ props.title.clone() }</h1>
                    if let Some(subtitle) = &props.subtitle {
                        <p class="page-header__subtitle">{ subtitle.clone() }</p>
                    }
                </div>
                if has_actions {
                    <div class="page-header__actions">
                        { for props.children.iter() }
                    </div>
                }
            </header>
        }
    }
}
