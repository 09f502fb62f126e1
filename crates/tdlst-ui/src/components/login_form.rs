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
pub struct LoginFormProps {
  pub on_login:
    Callback<(String, String)>,
  pub on_show_register: Callback<()>
}

#[function_component(LoginForm)]
pub fn login_form(
  props: &LoginFormProps
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
    let on_login = props.on_login.clone();
    Callback::from(move |e: SubmitEvent| {
      e.prevent_default();
      on_login.emit((
        (*email).clone(),
        (*password).clone()
      ));
    })
  };

  let on_show_register = {
    let on_show_register =
      props.on_show_register.clone();
    Callback::from(move |_| {
      on_show_register.emit(())
    })
  };

  html! {
      <div class="shell auth">
          <h1>{ "Sign in" }</h1>
          <form onsubmit={on_submit}>
              <p>
                  <input type="email" placeholder="Email" value={(*email).clone()} oninput={on_email} />
              </p>
              <p>
                  <input type="password" placeholder="Password" value={(*password).clone()} oninput={on_password} />
              </p>
              <button class="btn" type="submit">{ "Sign in" }</button>
          </form>
          <button class="btn ghost" onclick={on_show_register}>{ "Need an account? Register" }</button>
      </div>
  }
}
