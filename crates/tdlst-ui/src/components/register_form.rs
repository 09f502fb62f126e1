use web_sys::HtmlInputElement;
use yew::{
  Callback,
  Html,
  InputEvent,
  Properties,
  SubmitEvent,
  TargetCast,
  function_component,
  html,
  use_state
};

#[derive(Properties, PartialEq)]
pub struct RegisterFormProps {
  pub error:         Option<String>,
  pub on_register:
    Callback<(String, String)>,
  pub on_show_login: Callback<()>
}

#[function_component(RegisterForm)]
pub fn register_form(
  props: &RegisterFormProps
) -> Html {
  let email = use_state(String::new);
  let password = use_state(String::new);

  let on_email = {
    let email = email.clone();
    Callback::from(move |e: InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      email.set(input.value());
    })
  };

  let on_password = {
    let password = password.clone();
    Callback::from(move |e: InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      password.set(input.value());
    })
  };

  let on_submit = {
    let email = email.clone();
    let password = password.clone();
    let on_register =
      props.on_register.clone();
    Callback::from(move |e: SubmitEvent| {
      e.prevent_default();
      on_register.emit((
        (*email).clone(),
        (*password).clone()
      ));
    })
  };

  let on_show_login = {
    let on_show_login =
      props.on_show_login.clone();
    Callback::from(move |_| {
      on_show_login.emit(())
    })
  };

  html! {
      <div class="shell auth">
          <h1>{ "Create account" }</h1>
          <form onsubmit={on_submit}>
              <p>
                  <input type="email" placeholder="Email" value={(*email).clone()} oninput={on_email} />
              </p>
              <p>
                  <input type="password" placeholder="Password" value={(*password).clone()} oninput={on_password} />
              </p>
              {
                  if let Some(error) = &props.error {
                      html! { <p class="error">{ error }</p> }
                  } else {
                      html! {}
                  }
              }
              <button class="btn" type="submit">{ "Register" }</button>
          </form>
          <button class="btn ghost" onclick={on_show_login}>{ "Already registered? Sign in" }</button>
      </div>
  }
}
