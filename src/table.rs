//! Generic data table view: sortable headers, checkbox selection, a
//! per-row action menu and a pagination footer. All state transitions live
//! in `table_core`; this module only wires them to the DOM.

use leptos::prelude::*;

use crate::components::{use_click_away, Badge};
use crate::table_core::{
    sort_rows, CellValue, PageState, Row, RowSelection, SortConfig, SortDirection,
    ROWS_PER_PAGE_CHOICES,
};

/// One entry in a row's "..." menu. The handler receives the row id.
#[derive(Clone)]
pub struct RowAction {
    pub label: &'static str,
    pub danger: bool,
    pub on_run: Callback<String>,
}

impl RowAction {
    pub fn new(label: &'static str, on_run: Callback<String>) -> Self {
        Self {
            label,
            danger: false,
            on_run,
        }
    }

    pub fn danger(label: &'static str, on_run: Callback<String>) -> Self {
        Self {
            label,
            danger: true,
            on_run,
        }
    }
}

#[component]
pub fn DataTable(
    columns: Vec<&'static str>,
    #[prop(into)] rows: Signal<Vec<Row>>,
    #[prop(optional)] actions: Vec<RowAction>,
    /// Column rendered as a colored pill instead of plain text.
    #[prop(optional, into)]
    badge_column: Option<usize>,
    /// Enables selection checkboxes and the bulk delete button.
    #[prop(optional, into)]
    on_bulk_delete: Option<Callback<Vec<Row>>>,
) -> impl IntoView {
    let sort = RwSignal::new(SortConfig::default());
    let page = RwSignal::new(PageState::new(ROWS_PER_PAGE_CHOICES[0]));
    let selection = RwSignal::new(RowSelection::default());
    let open_menu = RwSignal::new(None::<String>);

    let sorted = Memo::new(move |_| sort_rows(&rows.get(), sort.get()));

    // Any click outside a menu button closes the open menu.
    use_click_away().listen(move || {
        open_menu.try_set(None);
    });

    // A shrinking row list must not leave the page past the end.
    Effect::new(move |_| {
        let len = sorted.with(Vec::len);
        page.update(|p| {
            let current = p.page;
            p.set_page(current, len);
        });
    });

    let paged = move || {
        let all = sorted.get();
        let (start, end) = page.get().slice_bounds(all.len());
        all[start..end].to_vec()
    };

    let selectable = on_bulk_delete.is_some();
    let has_actions = !actions.is_empty();

    let run_bulk = move |_| {
        if let Some(callback) = on_bulk_delete {
            let current = sorted.get();
            let taken = selection
                .try_update(|s| s.take_selected(&current))
                .unwrap_or_default();
            if !taken.is_empty() {
                callback.run(taken);
            }
        }
    };

    let header_cells = columns
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            let indicator = move || match sort.get() {
                SortConfig {
                    key: Some(key),
                    direction,
                } if key == index => match direction {
                    SortDirection::Ascending => "\u{25b4}",
                    SortDirection::Descending => "\u{25be}",
                },
                _ => "",
            };
            view! {
                <th>
                    <button class="table-sort" on:click=move |_| sort.update(|s| *s = s.toggle(index))>
                        {name}
                        <span class="sort-indicator">{indicator}</span>
                    </button>
                </th>
            }
        })
        .collect::<Vec<_>>();

    view! {
        <div class="data-table">
            {selectable
                .then(|| {
                    view! {
                        <div class="table-toolbar">
                            {move || {
                                let count = selection.with(RowSelection::len);
                                (count > 0)
                                    .then(|| {
                                        view! {
                                            <button class="table-bulk-delete" on:click=run_bulk>
                                                {format!("Delete Selected ({count})")}
                                            </button>
                                        }
                                    })
                            }}
                        </div>
                    }
                })}
            <table>
                <thead>
                    <tr>
                        {selectable
                            .then(|| {
                                view! {
                                    <th class="table-check">
                                        <input
                                            type="checkbox"
                                            prop:checked=move || {
                                                selection.with(|s| s.all_selected(&sorted.get()))
                                            }
                                            on:change=move |_| {
                                                let current = sorted.get();
                                                selection.update(|s| s.toggle_all(&current));
                                            }
                                        />
                                    </th>
                                }
                            })}
                        {header_cells}
                        {has_actions.then(|| view! { <th class="table-actions-head"></th> })}
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let actions = actions.clone();
                        paged()
                            .into_iter()
                            .map(|row| {
                                view! {
                                    <TableRow
                                        row=row
                                        actions=actions.clone()
                                        badge_column=badge_column
                                        selectable=selectable
                                        selection=selection
                                        open_menu=open_menu
                                    />
                                }
                            })
                            .collect::<Vec<_>>()
                    }}
                </tbody>
            </table>
            <div class="table-footer">
                <label class="table-page-size">
                    "Rows per page"
                    <select on:change=move |ev| {
                        if let Ok(choice) = event_target_value(&ev).parse::<usize>() {
                            page.update(|p| p.set_rows_per_page(choice));
                        }
                    }>
                        {ROWS_PER_PAGE_CHOICES
                            .into_iter()
                            .map(|choice| {
                                view! {
                                    <option
                                        value=choice.to_string()
                                        prop:selected=move || page.get().rows_per_page == choice
                                    >
                                        {choice.to_string()}
                                    </option>
                                }
                            })
                            .collect::<Vec<_>>()}
                    </select>
                </label>
                <span class="table-range">
                    {move || {
                        let len = sorted.with(Vec::len);
                        let (start, end) = page.get().slice_bounds(len);
                        if len == 0 {
                            "No rows".to_string()
                        } else {
                            format!("Showing {}-{} of {}", start + 1, end, len)
                        }
                    }}
                </span>
                <div class="table-pager">
                    <button
                        on:click=move |_| page.update(|p| p.previous())
                        prop:disabled=move || page.get().page == 1
                    >
                        "Previous"
                    </button>
                    {move || {
                        let len = sorted.with(Vec::len);
                        let state = page.get();
                        (1..=state.total_pages(len))
                            .map(|number| {
                                let class = if number == state.page {
                                    "pager-page pager-current"
                                } else {
                                    "pager-page"
                                };
                                view! {
                                    <button
                                        class=class
                                        on:click=move |_| {
                                            let len = sorted.with(Vec::len);
                                            page.update(|p| p.set_page(number, len));
                                        }
                                    >
                                        {number.to_string()}
                                    </button>
                                }
                            })
                            .collect::<Vec<_>>()
                    }}
                    <button
                        on:click=move |_| {
                            let len = sorted.with(Vec::len);
                            page.update(|p| p.next(len));
                        }
                        prop:disabled=move || {
                            let len = sorted.with(Vec::len);
                            let state = page.get();
                            state.page >= state.total_pages(len)
                        }
                    >
                        "Next"
                    </button>
                </div>
            </div>
        </div>
    }
}

#[component]
fn TableRow(
    row: Row,
    actions: Vec<RowAction>,
    badge_column: Option<usize>,
    selectable: bool,
    selection: RwSignal<RowSelection>,
    open_menu: RwSignal<Option<String>>,
) -> impl IntoView {
    let id = row.id.clone();
    let check_id = id.clone();
    let menu_id = id.clone();
    let has_actions = !actions.is_empty();

    let cells = row
        .cells
        .into_iter()
        .enumerate()
        .map(|(index, cell)| {
            let badge = badge_column == Some(index);
            let content = match cell {
                CellValue::Text(text) if badge => {
                    view! { <Badge text=text color="indigo" dark_color="slate" /> }.into_any()
                }
                CellValue::Text(text) => view! { <span>{text}</span> }.into_any(),
                CellValue::Link { label, href } => {
                    view! { <a href=href>{label}</a> }.into_any()
                }
            };
            view! { <td>{content}</td> }
        })
        .collect::<Vec<_>>();

    view! {
        <tr>
            {selectable
                .then(|| {
                    let toggle_id = check_id.clone();
                    let checked_id = check_id.clone();
                    view! {
                        <td class="table-check">
                            <input
                                type="checkbox"
                                prop:checked=move || selection.with(|s| s.contains(&checked_id))
                                on:change=move |_| selection.update(|s| s.toggle(&toggle_id))
                            />
                        </td>
                    }
                })}
            {cells}
            {has_actions
                .then(|| {
                    let toggle_id = menu_id.clone();
                    let shown_id = menu_id.clone();
                    view! {
                        <td class="table-actions">
                            <button
                                class="action-menu-button"
                                on:mousedown=|ev| ev.stop_propagation()
                                on:click=move |_| {
                                    open_menu
                                        .update(|open| {
                                            *open = if open.as_deref() == Some(toggle_id.as_str()) {
                                                None
                                            } else {
                                                Some(toggle_id.clone())
                                            };
                                        });
                                }
                            >
                                "\u{22ef}"
                            </button>
                            {move || {
                                let actions = actions.clone();
                                let row_id = shown_id.clone();
                                (open_menu.get().as_deref() == Some(row_id.as_str()))
                                    .then(|| {
                                        view! {
                                            <ul
                                                class="action-menu"
                                                on:mousedown=|ev| ev.stop_propagation()
                                            >
                                                {actions
                                                    .into_iter()
                                                    .map(|action| {
                                                        let row_id = row_id.clone();
                                                        let label = action.label;
                                                        let handler = action.on_run;
                                                        let class = if action.danger {
                                                            "action-item action-danger"
                                                        } else {
                                                            "action-item"
                                                        };
                                                        view! {
                                                            <li>
                                                                <button
                                                                    class=class
                                                                    on:click=move |_| {
                                                                        open_menu.set(None);
                                                                        handler.run(row_id.clone());
                                                                    }
                                                                >
                                                                    {label}
                                                                </button>
                                                            </li>
                                                        }
                                                    })
                                                    .collect::<Vec<_>>()}
                                            </ul>
                                        }
                                    })
                            }}
                        </td>
                    }
                })}
        </tr>
    }
}
