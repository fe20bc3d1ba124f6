use dotenvy::dotenv;
use serde::Deserialize;
use serde_json::{json, Value};
use venice_sdk::{ChatCompletionRequest, FunctionDefinition, Message, ToolChoiceMode};

mod common;

const STOCK_PRICE: i64 = 100;

#[derive(Debug)]
struct Account {
    balance: i64,
}

impl Account {
    fn trade(&mut self, args: &TradeArgs) -> Value {
        println!(
            "[TOOLS trade()] Trading {} shares of {} with action: {}",
            args.quantity, args.symbol, args.action
        );

        let change = match args.action.as_str() {
            "buy" => -args.quantity * STOCK_PRICE,
            "sell" => args.quantity * STOCK_PRICE,
            _ => 0,
        };
        self.balance += change;

        json!({
            "success": true,
            "balance": self.balance,
            "balance_change": change
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TradeArgs {
    action: String, // "buy" | "sell"
    quantity: i64,
    symbol: String,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let client = common::get_client();
    let mut account = Account { balance: 1000 };

    let trade = FunctionDefinition::new("trade")
        .with_description("Trade stocks")
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "action": { "type": "string", "enum": ["buy", "sell"] },
                "quantity": { "type": "number" },
                "symbol": { "type": "string" }
            },
            "required": ["action", "quantity", "symbol"],
            "additionalProperties": false
        }));

    let mut messages = vec![Message::user(
        "I would like to buy 50 NVDA stocks and sell 10 AAPL stocks.",
    )];

    loop {
        let completion = client
            .chat()
            .completions()
            .create(&ChatCompletionRequest {
                tools: Some(vec![trade.clone().into()]),
                tool_choice: Some(ToolChoiceMode::Auto.into()),
                ..ChatCompletionRequest::new(common::CHAT_MODEL, messages.clone())
            })
            .await
            .unwrap();

        let Some(message) = completion.message().cloned() else {
            break;
        };
        let tool_calls = completion.tool_calls().to_vec();
        messages.push(message);

        if tool_calls.is_empty() {
            println!("{}", completion.content().unwrap_or_default());
            break;
        }

        for call in tool_calls {
            let args: TradeArgs = serde_json::from_value(call.parse_arguments().unwrap()).unwrap();
            let result = account.trade(&args);
            messages.push(Message::tool(call.id, result.to_string()));
        }
    }

    println!("Final balance: {}", account.balance);
}
