use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use lookup_agent::config::AgentConfig;
use lookup_agent::logging::{self, Severity};
use lookup_agent::App;

const HELP: &str = "\
Comandos:
  nome <nome>   busca a pessoa (um nome sozinho também funciona)
  key <valor>   define a Gemini API Key
  gemini        ativa o fluxo de visão
  fechar        fecha o Telegram embutido
  atualizar     recarrega o Telegram embutido
  copiar        copia o conteúdo do visualizador
  baixar        salva o conteúdo do visualizador em arquivo
  log           mostra o log
  limpar        limpa o log
  sair          encerra";

#[tokio::main]
async fn main() {
    logging::init_logging();

    let config = AgentConfig::from_env();
    let app = match App::with_defaults(config) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("falha ao iniciar: {}", err);
            std::process::exit(1);
        }
    };
    app.bootstrap();

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                eprintln!("erro de leitura: {}", err);
                break;
            }
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let (cmd, rest) = match input.split_once(' ') {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (input, ""),
        };

        match cmd {
            "sair" | "quit" => break,
            "ajuda" | "help" => println!("{}", HELP),
            "key" => app.set_api_key(rest),
            "nome" => app.dispatcher.search_person(rest),
            "gemini" => {
                app.orchestrator.activate().await;
            }
            "fechar" => app.dispatcher.close_telegram(),
            "atualizar" => app.dispatcher.refresh_telegram(),
            "copiar" => app.viewer.copy_content(),
            "baixar" => match app.viewer.download() {
                Ok(path) => println!("salvo em {}", path.display()),
                Err(err) => eprintln!("falha ao salvar: {}", err),
            },
            "limpar" => app.log.clear(),
            "log" => {
                for entry in app.log.entries() {
                    println!(
                        "[{}] {} {}",
                        entry.timestamp,
                        entry.severity.icon(),
                        entry.message
                    );
                }
            }
            // A bare line is the name field of the original page.
            _ => app.dispatcher.search_person(input),
        }
    }
}
