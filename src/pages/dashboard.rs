use crate::components::ui::{
    Button, ButtonSize, Card, CardContent, CardGrid, CardHeader, CardTitle, ErrorBanner,
    PageSpinner,
};
use crate::components::{AppLayout, NoteCard, NoteForm};
use crate::models::Note;
use crate::pages::confirm_delete;
use crate::state::form::NoteDraft;
use crate::state::notes::{
    confirm_and_delete, fetch_user_notes, submit_create, submit_update, NoteListState,
    CREATE_NOTE_ERROR, DELETE_NOTE_ERROR, LOAD_NOTES_ERROR, UPDATE_NOTE_ERROR,
};
use crate::state::AppContext;
use crate::util::Liveness;
use icons::Plus;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use leptos_router::NavigateOptions;

#[derive(Clone, Debug, PartialEq)]
enum FormMode {
    Closed,
    Create,
    Edit(Note),
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());

    let list: RwSignal<NoteListState> = RwSignal::new(NoteListState::default());
    let form: RwSignal<FormMode> = RwSignal::new(FormMode::Closed);
    let loading = Signal::derive(move || list.with(|s| s.loading));
    let error = Signal::derive(move || list.with(|s| s.error.clone()));

    let alive = Liveness::new();

    // Initial load.
    {
        let alive = alive.clone();
        let user_id = app_state.0.session.with_untracked(|s| s.user().map(|u| u.id.clone()));
        match user_id {
            Some(user_id) => {
                list.update(|s| s.begin());
                let api = app_state.0.api_client();
                spawn_local(async move {
                    let result = fetch_user_notes(&api, &user_id).await;
                    if !alive.is_alive() {
                        return;
                    }
                    list.try_update(|s| match result {
                        Ok(notes) => s.loaded(notes),
                        Err(_) => s.failed(LOAD_NOTES_ERROR),
                    });
                });
            }
            None => {
                tracing::warn!("signed in without a stored profile; cannot list notes");
                list.update(|s| s.failed(LOAD_NOTES_ERROR));
            }
        }
    }

    // Push channel for the lifetime of this view.
    {
        let alive = alive.clone();
        let ws_url = app_state.0.config.with_value(|c| c.ws_url.clone());
        let connected = app_state.0.feed.with_value(|feed| {
            let alive = alive.clone();
            feed.connect(&ws_url, move |note| {
                if !alive.is_alive() {
                    return;
                }
                list.try_update(|s| {
                    let outcome = s.pushed(note);
                    tracing::debug!(?outcome, "merged pushed note");
                });
            })
        });
        let generation = connected
            .inspect_err(|e| tracing::warn!(error = %e, "live updates unavailable"))
            .ok();

        on_cleanup({
            let alive = alive.clone();
            let feed = app_state.0.feed;
            move || {
                alive.kill();
                if let Some(generation) = generation {
                    feed.with_value(|f| f.disconnect_if(generation));
                }
            }
        });
    }

    let on_submit = {
        let alive = alive.clone();
        Callback::new(move |draft: NoteDraft| {
            let mode = form.get_untracked();
            let api = app_state.0.api_client();
            let alive = alive.clone();
            list.update(|s| s.begin());

            spawn_local(async move {
                match mode {
                    FormMode::Edit(note) => {
                        let result = submit_update(&api, &note.id, &draft.into_patch()).await;
                        if !alive.is_alive() {
                            return;
                        }
                        match result {
                            Ok(updated) => {
                                list.try_update(|s| s.updated(updated));
                                form.try_set(FormMode::Closed);
                            }
                            Err(_) => {
                                list.try_update(|s| s.failed(UPDATE_NOTE_ERROR));
                            }
                        }
                    }
                    FormMode::Create | FormMode::Closed => {
                        let result = submit_create(&api, &draft.into_new_note()).await;
                        if !alive.is_alive() {
                            return;
                        }
                        match result {
                            Ok(created) => {
                                list.try_update(|s| s.created(created));
                                form.try_set(FormMode::Closed);
                            }
                            Err(_) => {
                                list.try_update(|s| s.failed(CREATE_NOTE_ERROR));
                            }
                        }
                    }
                }
            });
        })
    };

    let on_delete = {
        let alive = alive.clone();
        Callback::new(move |id: String| {
            let api = app_state.0.api_client();
            let alive = alive.clone();

            spawn_local(async move {
                let begin = || {
                    list.update(|s| s.begin());
                };
                let Some(result) = confirm_and_delete(&api, &id, confirm_delete, begin).await
                else {
                    return;
                };
                if !alive.is_alive() {
                    return;
                }
                list.try_update(|s| match result {
                    Ok(()) => s.deleted(&id),
                    Err(_) => s.failed(DELETE_NOTE_ERROR),
                });
            });
        })
    };

    let on_open = Callback::new(move |id: String| {
        let path = format!("/notes/{}", urlencoding::encode(&id));
        navigate.with_value(|nav| nav(&path, NavigateOptions::default()));
    });

    let on_edit = Callback::new(move |note: Note| form.set(FormMode::Edit(note)));
    let on_cancel = Callback::new(move |_: ()| form.set(FormMode::Closed));

    view! {
        <AppLayout>
            <div class="space-y-4">
                <div class="flex items-center justify-between">
                    <h1 class="text-xl font-semibold">"My Notes"</h1>
                    <Show when=move || form.get() == FormMode::Closed fallback=|| ().into_view()>
                        <Button size=ButtonSize::Sm on:click=move |_| form.set(FormMode::Create)>
                            <Plus />
                            "New Note"
                        </Button>
                    </Show>
                </div>

                <ErrorBanner error=error />

                {move || {
                    let (title, initial) = match form.get() {
                        FormMode::Closed => return ().into_any(),
                        FormMode::Create => ("Create New Note", None),
                        FormMode::Edit(note) => ("Edit Note", Some(note)),
                    };
                    view! {
                        <Card>
                            <CardHeader>
                                <CardTitle>{title}</CardTitle>
                            </CardHeader>
                            <CardContent>
                                {match initial {
                                    Some(note) => view! {
                                        <NoteForm
                                            initial=note
                                            on_submit=on_submit
                                            on_cancel=on_cancel
                                            loading=loading
                                        />
                                    }
                                    .into_any(),
                                    None => view! {
                                        <NoteForm on_submit=on_submit on_cancel=on_cancel loading=loading />
                                    }
                                    .into_any(),
                                }}
                            </CardContent>
                        </Card>
                    }
                    .into_any()
                }}

                {move || {
                    let (notes, busy) = list.with(|s| (s.notes.clone(), s.loading));
                    if notes.is_empty() {
                        return if busy {
                            view! { <PageSpinner /> }.into_any()
                        } else {
                            view! {
                                <div class="py-12 text-center text-sm text-muted-foreground">
                                    "You don't have any notes yet. Create your first note!"
                                </div>
                            }
                            .into_any()
                        };
                    }
                    view! {
                        <CardGrid>
                            {notes
                                .into_iter()
                                .map(|note| view! {
                                    <NoteCard
                                        note=note
                                        on_open=on_open
                                        on_edit=on_edit
                                        on_delete=on_delete
                                        busy=loading
                                    />
                                })
                                .collect_view()}
                        </CardGrid>
                    }
                    .into_any()
                }}
            </div>
        </AppLayout>
    }
}
