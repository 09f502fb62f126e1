use std::cell::RefCell;
use std::rc::Rc;

use tdlst_core::api::{
  self,
  HttpTaskApi,
  RemoteIntent
};
use tdlst_core::config::AppConfig;
use tdlst_core::controller::{
  Controller,
  Screen
};
use tdlst_core::filter::StatusFilter;
use tdlst_core::storage::PersistedStore;
use tdlst_shared::TaskId;
use wasm_bindgen_futures::spawn_local;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html,
  use_effect_with,
  use_force_update,
  use_memo,
  use_mut_ref,
  use_state
};

use crate::components::{
  FilterBar,
  LoginForm,
  RegisterForm,
  SessionHeader,
  TaskForm,
  TaskList
};
use crate::storage::AppStorage;

type SharedController =
  Rc<RefCell<Controller<AppStorage>>>;

#[derive(Properties, PartialEq)]
pub struct AppProps {
  pub config: AppConfig
}

/// Sends one remote mutation and feeds
/// the outcome back to the controller.
/// Failures are logged and drained so
/// the list does not grow for the life
/// of the page.
fn spawn_intent(
  api: Rc<HttpTaskApi>,
  controller: SharedController,
  intent: RemoteIntent
) {
  spawn_local(async move {
    let report =
      api::dispatch(&*api, &intent).await;
    let mut controller =
      controller.borrow_mut();
    controller.settle(report);
    for failed in
      controller.take_remote_failures()
    {
      tracing::warn!(
        seq = failed.seq,
        id = %failed.task_id,
        error = ?failed.result,
        "remote mutation failed; local \
         state kept"
      );
    }
  });
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
  let api = use_memo(
    props.config.api_base_url.clone(),
    |url| HttpTaskApi::new(url.clone())
  );
  let controller = {
    let keys = props.config.storage.clone();
    use_mut_ref(move || {
      Controller::new(PersistedStore::new(
        AppStorage::detect(),
        keys
      ))
    })
  };
  let redraw = use_force_update();
  let register_error =
    use_state(|| None::<String>);

  {
    let api = api.clone();
    let controller = controller.clone();
    let redraw = redraw.clone();
    use_effect_with((), move |_| {
      tracing::debug!(
        "app mounted; loading remote \
         tasks"
      );
      spawn_local(async move {
        let tasks =
          api::fetch_tasks(&*api).await;
        controller
          .borrow_mut()
          .replace_tasks(tasks);
        redraw.force_update();
      });
      || ()
    });
  }

  let on_register = {
    let controller = controller.clone();
    let register_error =
      register_error.clone();
    let redraw = redraw.clone();
    Callback::from(
      move |(email, password): (
        String,
        String
      )| {
        let result = controller
          .borrow_mut()
          .register(&email, &password);
        match result {
          | Ok(()) => {
            register_error.set(None)
          }
          | Err(err) => {
            tracing::warn!(error = %err, "registration rejected");
            register_error
              .set(Some(err.to_string()));
          }
        }
        redraw.force_update();
      }
    )
  };

  let on_login = {
    let controller = controller.clone();
    let redraw = redraw.clone();
    Callback::from(
      move |(email, password): (
        String,
        String
      )| {
        let result = controller
          .borrow_mut()
          .login(&email, &password);
        if result.is_err() {
          gloo::dialogs::alert(
            "Invalid credentials"
          );
        }
        redraw.force_update();
      }
    )
  };

  let on_logout = {
    let controller = controller.clone();
    let redraw = redraw.clone();
    Callback::from(move |()| {
      controller.borrow_mut().logout();
      redraw.force_update();
    })
  };

  let on_show_login = {
    let controller = controller.clone();
    let register_error =
      register_error.clone();
    let redraw = redraw.clone();
    Callback::from(move |()| {
      controller.borrow_mut().show_login();
      register_error.set(None);
      redraw.force_update();
    })
  };

  let on_show_register = {
    let controller = controller.clone();
    let redraw = redraw.clone();
    Callback::from(move |()| {
      controller
        .borrow_mut()
        .show_registration();
      redraw.force_update();
    })
  };

  let on_add = {
    let api = api.clone();
    let controller = controller.clone();
    let redraw = redraw.clone();
    Callback::from(move |text: String| {
      let draft = {
        let controller = controller.borrow();
        let author = controller
          .current_user()
          .unwrap_or_default()
          .to_string();
        controller
          .prepare_task(&text, &author)
      };

      let draft = match draft {
        | Ok(draft) => draft,
        | Err(err) => {
          tracing::warn!(error = %err, "task not submitted");
          return;
        }
      };

      let api = api.clone();
      let controller = controller.clone();
      let redraw = redraw.clone();
      spawn_local(async move {
        let created =
          api::create_task(&*api, &draft)
            .await;
        let accepted = controller
          .borrow_mut()
          .accept_created(created)
          .map(|task| task.id.clone());
        if let Err(err) = accepted {
          tracing::warn!(error = %err, "task was not added");
        }
        redraw.force_update();
      });
    })
  };

  let on_toggle = {
    let api = api.clone();
    let controller = controller.clone();
    let redraw = redraw.clone();
    Callback::from(move |id: TaskId| {
      let result = controller
        .borrow_mut()
        .toggle_task(&id);
      redraw.force_update();
      match result {
        | Ok(intent) => spawn_intent(
          api.clone(),
          controller.clone(),
          intent
        ),
        | Err(err) => {
          tracing::warn!(error = %err, "toggle ignored");
        }
      }
    })
  };

  let on_edit = {
    let api = api.clone();
    let controller = controller.clone();
    let redraw = redraw.clone();
    Callback::from(
      move |(id, text): (TaskId, String)| {
        let result = controller
          .borrow_mut()
          .edit_task(&id, &text);
        redraw.force_update();
        match result {
          | Ok(intent) => spawn_intent(
            api.clone(),
            controller.clone(),
            intent
          ),
          | Err(err) => {
            tracing::warn!(error = %err, "edit ignored");
          }
        }
      }
    )
  };

  let on_delete = {
    let api = api.clone();
    let controller = controller.clone();
    let redraw = redraw.clone();
    Callback::from(move |id: TaskId| {
      let result = controller
        .borrow_mut()
        .delete_task(&id);
      redraw.force_update();
      match result {
        | Ok(intent) => spawn_intent(
          api.clone(),
          controller.clone(),
          intent
        ),
        | Err(err) => {
          tracing::warn!(error = %err, "delete ignored");
        }
      }
    })
  };

  let on_query = {
    let controller = controller.clone();
    let redraw = redraw.clone();
    Callback::from(move |query: String| {
      controller.borrow_mut().set_query(query);
      redraw.force_update();
    })
  };

  let on_status = {
    let controller = controller.clone();
    let redraw = redraw.clone();
    Callback::from(
      move |status: StatusFilter| {
        controller
          .borrow_mut()
          .set_status_filter(status);
        redraw.force_update();
      }
    )
  };

  let screen = controller.borrow().screen();
  match screen {
    | Screen::Registration => html! {
        <RegisterForm
            error={(*register_error).clone()}
            on_register={on_register}
            on_show_login={on_show_login}
        />
    },
    | Screen::Login => html! {
        <LoginForm on_login={on_login} on_show_register={on_show_register} />
    },
    | Screen::Authenticated => {
      let mut state = controller.borrow_mut();
      let Some(user) = state
        .current_user()
        .map(str::to_string)
      else {
        return html! {};
      };
      let query = state.query().to_string();
      let status = state.status_filter();
      let visible =
        state.visible_tasks().to_vec();
      drop(state);

      html! {
          <div class="shell">
              <SessionHeader user={user} on_logout={on_logout} />
              <FilterBar
                  query={query}
                  status={status}
                  on_query={on_query}
                  on_status={on_status}
              />
              <TaskForm on_add={on_add} />
              <TaskList
                  tasks={visible}
                  on_toggle={on_toggle}
                  on_edit={on_edit}
                  on_delete={on_delete}
              />
          </div>
      }
    }
  }
}
